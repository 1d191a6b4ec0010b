//! # Resolución de Archivos Estáticos
//! src/server/files.rs
//!
//! Este módulo implementa el handler estático: mapea el path de cada
//! request a un archivo bajo el directorio servido y construye la
//! respuesta.
//!
//! ## Reglas de resolución
//!
//! ```text
//! Request path → sanitizar (sin "." ni "..") → unir al root
//!   no existe            → 404
//!   directorio sin "/"   → 301 agregando el slash
//!   directorio con "/"   → index.html si existe, si no listado generado
//!   archivo              → 200 con content-type de la tabla MIME
//! ```
//!
//! Solo GET y HEAD se sirven; POST y OPTIONS reciben 501 aunque la
//! allow-list CORS los anuncie.

use crate::http::{Method, Request, Response, StatusCode};
use crate::mime::MimeTable;
use std::fs;
use std::path::{Path, PathBuf};

/// Handler de archivos estáticos sobre un directorio raíz
pub struct StaticFiles {
    /// Directorio raíz servido
    root: PathBuf,

    /// Tabla de content-types, construida una vez al crear el handler
    mime: MimeTable,
}

impl StaticFiles {
    /// Crea un handler que sirve archivos bajo `root`
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            mime: MimeTable::new(),
        }
    }

    /// Construye la respuesta para un request ya parseado
    ///
    /// Los headers CORS no se agregan acá: van en un único punto del
    /// loop de conexiones, para que también los lleven las respuestas
    /// a requests que ni siquiera parsean.
    pub fn respond(&self, request: &Request) -> Response {
        match request.method() {
            Method::GET => self.resolve(request.path(), false),
            Method::HEAD => self.resolve(request.path(), true),
            other => Response::error(
                StatusCode::NotImplemented,
                &format!("Unsupported method ('{}')", other.as_str()),
            ),
        }
    }

    /// Resuelve un path de URL contra el directorio raíz
    fn resolve(&self, url_path: &str, head_only: bool) -> Response {
        let clean = sanitize_path(url_path);
        let fs_path = self.root.join(clean.trim_start_matches('/'));

        if !fs_path.exists() {
            return Response::error(StatusCode::NotFound, "File not found");
        }

        if fs_path.is_dir() {
            // Directorio pedido sin slash final: redirigir agregándolo
            if !url_path.ends_with('/') {
                return Response::new(StatusCode::MovedPermanently)
                    .with_header("Location", &format!("{}/", clean));
            }

            let index = fs_path.join("index.html");
            if index.is_file() {
                return self.serve_file(&index, head_only);
            }

            return self.directory_listing(&fs_path, &clean, head_only);
        }

        self.serve_file(&fs_path, head_only)
    }

    /// Sirve un archivo del disco
    ///
    /// Un archivo que desaparece o no se puede abrir entre el chequeo y
    /// la lectura se reporta como 404, igual que un path inexistente.
    fn serve_file(&self, path: &Path, head_only: bool) -> Response {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(_) => return Response::error(StatusCode::NotFound, "File not found"),
        };

        let content_type = self.mime.content_type_for(path);
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", content_type)
            .with_body_bytes(data);

        if head_only {
            response.head_only()
        } else {
            response
        }
    }

    /// Genera la página de listado de un directorio sin index.html
    fn directory_listing(&self, dir: &Path, url_path: &str, head_only: bool) -> Response {
        let html = match render_listing(dir, url_path) {
            Ok(html) => html,
            Err(e) => {
                return Response::error(
                    StatusCode::InternalServerError,
                    &format!("Failed to list directory: {}", e),
                );
            }
        };

        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/html")
            .with_body(&html);

        if head_only {
            response.head_only()
        } else {
            response
        }
    }
}

/// Sanitiza un path de URL eliminando componentes "." y ".."
///
/// Así ningún request puede escapar del directorio servido.
///
/// # Ejemplo
/// ```
/// use viewer_server::server::files::sanitize_path;
///
/// assert_eq!(sanitize_path("/../../etc/passwd"), "/etc/passwd");
/// assert_eq!(sanitize_path("/foo/../bar"), "/foo/bar");
/// ```
pub fn sanitize_path(path: &str) -> String {
    let parts: Vec<&str> = path
        .split('/')
        .filter(|p| !p.is_empty() && *p != "." && *p != "..")
        .collect();

    format!("/{}", parts.join("/"))
}

/// Genera el HTML del listado de un directorio
///
/// Entradas ordenadas por nombre; los subdirectorios llevan "/" final.
fn render_listing(dir: &Path, url_path: &str) -> std::io::Result<String> {
    let display_path = if url_path == "/" {
        "/".to_string()
    } else {
        format!("{}/", url_path)
    };

    let mut entries: Vec<String> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() {
            name.push('/');
        }
        entries.push(name);
    }
    entries.sort();

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str(&format!(
        "<title>Directory listing for {}</title>\n",
        display_path
    ));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>Directory listing for {}</h1>\n", display_path));
    html.push_str("<hr>\n<ul>\n");

    for name in &entries {
        html.push_str(&format!("<li><a href=\"{0}\">{0}</a></li>\n", name));
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");

    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    /// Crea un directorio temporal único con los assets de prueba
    fn temp_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "viewer_server_files_{}_{}",
            name,
            std::process::id()
        ));
        // Partir de un directorio limpio
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        let mut f = File::create(dir.join("PipeAssembly.obj")).unwrap();
        f.write_all(b"v 0.0 0.0 0.0\nv 1.0 0.0 0.0\n").unwrap();

        let mut f = File::create(dir.join("assembly-viewer.html")).unwrap();
        f.write_all(b"<html><body>viewer</body></html>").unwrap();

        let mut f = File::create(dir.join("texture.png")).unwrap();
        f.write_all(&[0x89, 0x50, 0x4E, 0x47]).unwrap();

        fs::create_dir_all(dir.join("lib")).unwrap();
        let mut f = File::create(dir.join("lib").join("viewer.js")).unwrap();
        f.write_all(b"export {};\n").unwrap();

        dir
    }

    fn get(files: &StaticFiles, target: &str) -> Response {
        let raw = format!("GET {} HTTP/1.1\r\n\r\n", target);
        let request = Request::parse(raw.as_bytes()).unwrap();
        files.respond(&request)
    }

    // ==================== Archivos ====================

    #[test]
    fn test_serve_obj_as_text_plain() {
        let files = StaticFiles::new(temp_root("obj"));
        let response = get(&files, "/PipeAssembly.obj");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            response.headers().get("Content-Type"),
            Some(&"text/plain".to_string())
        );
        assert_eq!(response.body(), b"v 0.0 0.0 0.0\nv 1.0 0.0 0.0\n");
    }

    #[test]
    fn test_serve_html_override() {
        let files = StaticFiles::new(temp_root("html"));
        let response = get(&files, "/assembly-viewer.html");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            response.headers().get("Content-Type"),
            Some(&"text/html".to_string())
        );
    }

    #[test]
    fn test_serve_png_guessed() {
        // Una extensión fuera de la tabla usa la deducción estándar
        let files = StaticFiles::new(temp_root("png"));
        let response = get(&files, "/texture.png");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            response.headers().get("Content-Type"),
            Some(&"image/png".to_string())
        );
    }

    #[test]
    fn test_serve_nested_file() {
        let files = StaticFiles::new(temp_root("nested"));
        let response = get(&files, "/lib/viewer.js");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            response.headers().get("Content-Type"),
            Some(&"application/javascript".to_string())
        );
    }

    #[test]
    fn test_missing_file_is_404() {
        let files = StaticFiles::new(temp_root("missing"));
        let response = get(&files, "/no-such-file.obj");

        assert_eq!(response.status(), StatusCode::NotFound);
        let body = String::from_utf8_lossy(response.body()).into_owned();
        assert!(body.contains("File not found"));
    }

    #[test]
    fn test_traversal_cannot_escape_root() {
        let files = StaticFiles::new(temp_root("traversal"));
        // "/../" se descarta y el path se resuelve dentro del root
        let response = get(&files, "/../../PipeAssembly.obj");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            response.headers().get("Content-Type"),
            Some(&"text/plain".to_string())
        );
    }

    // ==================== HEAD ====================

    #[test]
    fn test_head_sends_headers_without_body() {
        let files = StaticFiles::new(temp_root("head"));
        let raw = b"HEAD /PipeAssembly.obj HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        let response = files.respond(&request);

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            response.headers().get("Content-Length"),
            Some(&"28".to_string())
        );

        let bytes = response.to_bytes();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        assert!(text.ends_with("\r\n\r\n"));
    }

    // ==================== Directorios ====================

    #[test]
    fn test_directory_without_slash_redirects() {
        let files = StaticFiles::new(temp_root("redirect"));
        let response = get(&files, "/lib");

        assert_eq!(response.status(), StatusCode::MovedPermanently);
        assert_eq!(response.headers().get("Location"), Some(&"/lib/".to_string()));
    }

    #[test]
    fn test_directory_listing_generated() {
        let files = StaticFiles::new(temp_root("listing"));
        let response = get(&files, "/");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            response.headers().get("Content-Type"),
            Some(&"text/html".to_string())
        );

        let body = String::from_utf8_lossy(response.body()).into_owned();
        assert!(body.contains("Directory listing for /"));
        assert!(body.contains("PipeAssembly.obj"));
        assert!(body.contains("lib/"));
    }

    #[test]
    fn test_directory_with_index_serves_it() {
        let root = temp_root("index");
        let mut f = File::create(root.join("index.html")).unwrap();
        f.write_all(b"<html>home</html>").unwrap();

        let files = StaticFiles::new(root);
        let response = get(&files, "/");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), b"<html>home</html>");
    }

    // ==================== Métodos no implementados ====================

    #[test]
    fn test_post_is_501() {
        let files = StaticFiles::new(temp_root("post"));
        let raw = b"POST /PipeAssembly.obj HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        let response = files.respond(&request);

        assert_eq!(response.status(), StatusCode::NotImplemented);
        let body = String::from_utf8_lossy(response.body()).into_owned();
        assert!(body.contains("Unsupported method ('POST')"));
    }

    #[test]
    fn test_options_is_501() {
        let files = StaticFiles::new(temp_root("options"));
        let raw = b"OPTIONS / HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        let response = files.respond(&request);

        assert_eq!(response.status(), StatusCode::NotImplemented);
    }

    // ==================== sanitize_path ====================

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/"), "/");
        assert_eq!(sanitize_path("/foo/bar"), "/foo/bar");
        assert_eq!(sanitize_path("/../../../etc/passwd"), "/etc/passwd");
        assert_eq!(sanitize_path("/foo/../bar"), "/foo/bar");
        assert_eq!(sanitize_path("./test"), "/test");
    }
}
