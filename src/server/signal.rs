//! # Manejo de Señales
//! src/server/signal.rs
//!
//! El loop de conexiones es bloqueante, así que la única vía de apagado
//! es la señal de interrupción del sistema operativo. Un thread aparte
//! espera SIGINT/SIGTERM con `sigwait` y ejecuta el callback de apagado.

use std::thread;

/// Registra un callback para la interrupción del operador (Ctrl+C)
///
/// El callback corre una sola vez, en un thread dedicado que bloquea en
/// `sigwait` sobre SIGINT y SIGTERM. Las señales se bloquean primero en
/// el thread que llama (el principal): los threads heredan la máscara,
/// y así la señal solo puede llegar al thread que la espera.
///
/// # Ejemplo
/// ```no_run
/// viewer_server::server::signal::on_interrupt(|| {
///     println!("\n🛑 Server stopped by user");
///     std::process::exit(0);
/// });
/// ```
pub fn on_interrupt<F>(handler: F)
where
    F: Fn() + Send + 'static,
{
    unsafe {
        let mut mask: libc::sigset_t = std::mem::zeroed();
        libc::sigemptyset(&mut mask);
        libc::sigaddset(&mut mask, libc::SIGINT);
        libc::sigaddset(&mut mask, libc::SIGTERM);

        // Bloquear en el thread principal antes de spawnear el watcher
        libc::pthread_sigmask(libc::SIG_BLOCK, &mask, std::ptr::null_mut());

        thread::spawn(move || {
            let mut sig: libc::c_int = 0;
            loop {
                if libc::sigwait(&mask, &mut sig) == 0 {
                    handler();
                    break;
                }
            }
        });
    }
}
