//! # Tabla de Tipos MIME
//! src/mime.rs
//!
//! Este módulo resuelve el header `Content-Type` de cada respuesta en dos
//! pasos:
//!
//! 1. Una tabla fija de overrides para las extensiones del proyecto
//!    (`.obj`, `.html`, `.js`, `.css`). Los modelos `.obj` se sirven como
//!    `text/plain` para que el visor pueda leerlos con fetch().
//! 2. Si la extensión no está en la tabla, una deducción estándar por
//!    extensión, con `application/octet-stream` como último recurso.
//!
//! La tabla se construye una sola vez al arrancar y es de solo lectura
//! durante toda la vida del proceso.

use std::collections::HashMap;
use std::path::Path;

/// Tipo MIME por defecto cuando la extensión es desconocida
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Tabla inmutable de extensión → content-type
pub struct MimeTable {
    /// Overrides del proyecto; siempre ganan sobre la deducción estándar
    overrides: HashMap<&'static str, &'static str>,
}

impl MimeTable {
    /// Construye la tabla de overrides
    ///
    /// # Ejemplo
    /// ```
    /// use viewer_server::mime::MimeTable;
    /// use std::path::Path;
    ///
    /// let table = MimeTable::new();
    /// assert_eq!(table.content_type_for(Path::new("model.obj")), "text/plain");
    /// ```
    pub fn new() -> Self {
        let mut overrides = HashMap::new();
        overrides.insert("obj", "text/plain");
        overrides.insert("html", "text/html");
        overrides.insert("js", "application/javascript");
        overrides.insert("css", "text/css");

        Self { overrides }
    }

    /// Resuelve el content-type para un path
    ///
    /// La extensión se compara en minúsculas: `MODEL.OBJ` y `model.obj`
    /// reciben el mismo tipo.
    pub fn content_type_for(&self, path: &Path) -> &'static str {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(e) => e.to_lowercase(),
            None => return DEFAULT_MIME,
        };

        if let Some(content_type) = self.overrides.get(ext.as_str()) {
            return content_type;
        }

        default_guess(&ext)
    }
}

impl Default for MimeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Deducción estándar de content-type por extensión
///
/// Cubre los tipos que un servidor de assets de desarrollo encuentra en la
/// práctica; cualquier otra extensión cae en `application/octet-stream`.
pub fn default_guess(ext: &str) -> &'static str {
    match ext {
        // Texto
        "htm" => "text/html",
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "mjs" => "application/javascript",

        // Imágenes
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "bmp" => "image/bmp",

        // Audio y video
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",

        // Fuentes
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Binarios comunes
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "wasm" => "application/wasm",

        _ => DEFAULT_MIME,
    }
}
