//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Implementación del loop de conexiones. El servidor atiende una
//! conexión a la vez en un loop bloqueante: es una herramienta de
//! desarrollo local, no un servidor de producción.
//!
//! El único error de bind con tratamiento especial es el de puerto
//! ocupado; cualquier otro fallo de arranque se propaga sin clasificar.

use crate::config::Config;
use crate::http::{ParseError, Request, Response, StatusCode};
use crate::server::cors;
use crate::server::files::StaticFiles;
use chrono::Local;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};

/// Errores de arranque del servidor
#[derive(Debug)]
pub enum ServerError {
    /// El puerto pedido ya está ocupado por otro proceso
    AddressInUse { port: u16 },

    /// Cualquier otro fallo de socket, sin clasificar
    Io(io::Error),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::AddressInUse { port } => {
                write!(f, "port {} is already in use", port)
            }
            ServerError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<io::Error> for ServerError {
    fn from(e: io::Error) -> Self {
        ServerError::Io(e)
    }
}

/// Servidor de archivos estáticos sobre un socket TCP
pub struct Server {
    files: StaticFiles,
    listener: TcpListener,
}

impl Server {
    /// Hace bind del socket y deja el servidor listo para `run`
    ///
    /// # Errores
    ///
    /// * `ServerError::AddressInUse` si el puerto ya está ocupado
    /// * `ServerError::Io` para cualquier otro fallo de bind o si el
    ///   directorio a servir no se puede resolver
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        let root = config.serve_root()?;

        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|e| {
            if e.kind() == io::ErrorKind::AddrInUse {
                ServerError::AddressInUse { port: config.port }
            } else {
                ServerError::Io(e)
            }
        })?;

        Ok(Self {
            files: StaticFiles::new(root),
            listener,
        })
    }

    /// Dirección local real del socket (útil con puerto 0 en tests)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop bloqueante de aceptar y atender conexiones
    ///
    /// Una conexión a la vez. Un error atendiendo una conexión se
    /// reporta por stderr y no tumba el loop.
    pub fn run(&self) -> io::Result<()> {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(e) = self.handle_connection(stream) {
                        eprintln!("❌ Error handling connection: {}", e);
                    }
                }
                Err(e) => {
                    eprintln!("❌ Error accepting connection: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Atiende una conexión: lee el request, resuelve, responde y loggea
    fn handle_connection(&self, mut stream: TcpStream) -> io::Result<()> {
        let mut buffer = [0u8; 8192];
        let bytes_read = stream.read(&mut buffer)?;

        // El peer cerró sin mandar nada
        if bytes_read == 0 {
            return Ok(());
        }

        let raw_line = first_line(&buffer[..bytes_read]);

        let mut response = match Request::parse(&buffer[..bytes_read]) {
            Ok(request) => self.files.respond(&request),
            Err(ParseError::UnsupportedMethod(method)) => Response::error(
                StatusCode::NotImplemented,
                &format!("Unsupported method ('{}')", method),
            ),
            Err(e) => Response::error(
                StatusCode::BadRequest,
                &format!("Bad request syntax: {}", e),
            ),
        };

        // Toda respuesta lleva CORS, incluso las de error
        cors::apply(&mut response);

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        log_request(&raw_line, response.status());

        Ok(())
    }
}

/// Primera línea del buffer recibido, para el log de acceso
///
/// Se toma antes de parsear para poder loggear también los requests
/// que no parsean.
fn first_line(buffer: &[u8]) -> String {
    let text = String::from_utf8_lossy(buffer);
    text.lines().next().unwrap_or("").trim().to_string()
}

/// Emite la línea de log de un request atendido
///
/// Formato: `[07/Aug/2026 14:00:00] "GET /PipeAssembly.obj HTTP/1.1" 200 -`
fn log_request(request_line: &str, status: StatusCode) {
    let timestamp = Local::now().format("%d/%b/%Y %H:%M:%S");
    println!("[{}] \"{}\" {} -", timestamp, request_line, status.as_u16());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::path::PathBuf;
    use std::thread;
    use std::time::Duration;

    /// Directorio temporal único con un asset de prueba
    fn temp_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "viewer_server_tcp_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let mut f = File::create(dir.join("model.obj")).unwrap();
        std::io::Write::write_all(&mut f, b"v 0.0 0.0 0.0\n").unwrap();
        dir
    }

    /// Arranca un servidor en puerto efímero y retorna su dirección
    fn spawn_server(root: PathBuf) -> SocketAddr {
        let config = Config {
            port: 0,
            host: "127.0.0.1".to_string(),
            dir: Some(root),
        };
        let server = Server::bind(config).unwrap();
        let addr = server.local_addr().unwrap();
        thread::spawn(move || {
            let _ = server.run();
        });
        addr
    }

    fn send_raw(addr: SocketAddr, raw: &[u8]) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        stream.write_all(raw).unwrap();
        stream.shutdown(std::net::Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_serves_file_with_cors_headers() {
        let addr = spawn_server(temp_root("ok"));
        let text = send_raw(addr, b"GET /model.obj HTTP/1.1\r\n\r\n");

        assert!(text.contains("200 OK"));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.contains("Access-Control-Allow-Origin: *\r\n"));
        assert!(text.contains("Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n"));
        assert!(text.contains("Access-Control-Allow-Headers: Content-Type\r\n"));
        assert!(text.contains("v 0.0 0.0 0.0"));
    }

    #[test]
    fn test_not_found_also_has_cors_headers() {
        let addr = spawn_server(temp_root("nf"));
        let text = send_raw(addr, b"GET /missing.css HTTP/1.1\r\n\r\n");

        assert!(text.contains("404 Not Found"));
        assert!(text.contains("Access-Control-Allow-Origin: *\r\n"));
        assert!(text.contains("Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n"));
        assert!(text.contains("Access-Control-Allow-Headers: Content-Type\r\n"));
    }

    #[test]
    fn test_parse_error_is_400_with_cors() {
        let addr = spawn_server(temp_root("bad"));
        let text = send_raw(addr, b"\x00\x01\x02garbage");

        assert!(text.contains("400 Bad Request"));
        assert!(text.contains("Access-Control-Allow-Origin: *\r\n"));
    }

    #[test]
    fn test_unknown_method_is_501() {
        let addr = spawn_server(temp_root("put"));
        let text = send_raw(addr, b"PUT /model.obj HTTP/1.1\r\n\r\n");

        assert!(text.contains("501 Not Implemented"));
        assert!(text.contains("Unsupported method ('PUT')"));
    }

    #[test]
    fn test_sequential_requests() {
        let addr = spawn_server(temp_root("seq"));
        for _ in 0..3 {
            let text = send_raw(addr, b"GET /model.obj HTTP/1.1\r\n\r\n");
            assert!(text.contains("200 OK"));
        }
    }

    #[test]
    fn test_peer_closed_immediately() {
        // Cubre la rama bytes_read == 0: el loop debe seguir vivo
        let addr = spawn_server(temp_root("closed"));
        drop(TcpStream::connect(addr).unwrap());

        let text = send_raw(addr, b"GET /model.obj HTTP/1.1\r\n\r\n");
        assert!(text.contains("200 OK"));
    }

    #[test]
    fn test_bind_address_in_use() {
        let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = occupied.local_addr().unwrap().port();

        let config = Config {
            port,
            host: "127.0.0.1".to_string(),
            dir: Some(temp_root("inuse")),
        };

        match Server::bind(config) {
            Err(ServerError::AddressInUse { port: reported }) => {
                assert_eq!(reported, port);
            }
            other => panic!("expected AddressInUse, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_first_line() {
        assert_eq!(
            first_line(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n"),
            "GET / HTTP/1.1"
        );
        assert_eq!(first_line(b"solo-una-linea"), "solo-una-linea");
    }
}
