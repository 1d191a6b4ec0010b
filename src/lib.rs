//! # Viewer Server
//! src/lib.rs
//!
//! Servidor HTTP de archivos estáticos para desarrollo local del
//! Interactive Assembly Viewer. Sirve el visor HTML y el modelo 3D (.obj)
//! con headers CORS permisivos y tipos MIME fijos para las extensiones
//! del proyecto.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing de requests y construcción de responses HTTP
//! - `mime`: Tabla de tipos MIME (overrides + deducción por extensión)
//! - `server`: Loop TCP bloqueante, resolución de archivos, CORS y señales
//! - `config`: Configuración por CLI y variables de entorno
//!
//! ## Ejemplo de uso
//!
//! ```ignore
//! use viewer_server::config::Config;
//! use viewer_server::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(config).expect("Error al iniciar servidor");
//! server.run().expect("Error en el loop de conexiones");
//! ```

pub mod config;
pub mod http;
pub mod mime;
pub mod server;
