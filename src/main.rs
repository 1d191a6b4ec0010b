//! # Viewer Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor de archivos estáticos del
//! Interactive Assembly Viewer.
//!
//! Códigos de salida:
//! - 0: apagado normal por interrupción del operador
//! - 1: el puerto pedido ya estaba ocupado
//! - otro: fallo de arranque sin clasificar (se propaga desde main)

use std::env;
use std::fs;
use std::process;

use viewer_server::config::Config;
use viewer_server::server::{signal, Server, ServerError};

fn main() -> Result<(), ServerError> {
    let mut config = Config::new();

    // Anclar el proceso al directorio servido: las rutas relativas no
    // dependen de desde dónde se invoque el binario
    let root = fs::canonicalize(config.serve_root()?)?;
    env::set_current_dir(&root)?;
    config.dir = Some(root.clone());

    config.print_banner(&root);

    // Registrar el apagado por Ctrl+C antes de hacer bind
    signal::on_interrupt(|| {
        println!("\n🛑 Server stopped by user");
        process::exit(0);
    });

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(ServerError::AddressInUse { port }) => {
            println!(
                "❌ Port {} is already in use. Try a different port using --port <number>.",
                port
            );
            process::exit(1);
        }
        // Cualquier otro fallo de arranque se propaga sin clasificar
        Err(other) => return Err(other),
    };

    server.run()?;

    Ok(())
}
