//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor de archivos estáticos
//! con soporte para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./viewer_server --port 9090 --dir ./assets
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=9090 HTTP_HOST=0.0.0.0 ./viewer_server
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Configuración del servidor de archivos estáticos
#[derive(Debug, Clone, Parser)]
#[command(name = "viewer_server")]
#[command(about = "Servidor HTTP local para el Interactive Assembly Viewer")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha (por defecto todas las interfaces)
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio a servir; si se omite, el directorio del ejecutable
    #[arg(long, env = "SERVE_DIR")]
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```
    /// use viewer_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resuelve el directorio a servir
    ///
    /// Si no se indicó `--dir`, se ancla al directorio que contiene el
    /// ejecutable. Así el serving relativo no depende de desde dónde se
    /// invoque el binario.
    pub fn serve_root(&self) -> std::io::Result<PathBuf> {
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }

        let exe = std::env::current_exe()?;
        let root = exe.parent().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "executable has no parent directory",
            )
        })?;

        Ok(root.to_path_buf())
    }

    /// Imprime el banner de inicio con las URLs de ejemplo
    ///
    /// `root` es el directorio ya resuelto (y con chdir hecho) desde el
    /// que se sirven los archivos.
    pub fn print_banner(&self, root: &std::path::Path) {
        println!("🚀 Starting Interactive Assembly Viewer Server...");
        println!("📁 Serving directory: {}", root.display());
        println!("🌐 Server running at: http://localhost:{}", self.port);
        println!(
            "🔧 Assembly Viewer: http://localhost:{}/assembly-viewer.html",
            self.port
        );
        println!("📦 OBJ File: http://localhost:{}/PipeAssembly.obj", self.port);
        println!("\nPress Ctrl+C to stop the server");
        println!("{}", "-".repeat(50));
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            dir: None,
        }
    }
}
