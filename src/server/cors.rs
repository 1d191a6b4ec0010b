//! # Headers CORS
//! src/server/cors.rs
//!
//! Headers de Cross-Origin Resource Sharing para desarrollo local: el
//! visor se abre muchas veces desde `file://` u otro puerto y necesita
//! poder leer los assets con fetch(). Los tres headers van en TODA
//! respuesta, incluidas las de error.

use crate::http::Response;

/// Valor de `Access-Control-Allow-Origin`
pub const ALLOW_ORIGIN: &str = "*";

/// Valor de `Access-Control-Allow-Methods`
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";

/// Valor de `Access-Control-Allow-Headers`
pub const ALLOW_HEADERS: &str = "Content-Type";

/// Agrega los tres headers CORS a una respuesta
///
/// # Ejemplo
/// ```
/// use viewer_server::http::{Response, StatusCode};
/// use viewer_server::server::cors;
///
/// let mut response = Response::new(StatusCode::Ok);
/// cors::apply(&mut response);
/// assert_eq!(
///     response.headers().get("Access-Control-Allow-Origin"),
///     Some(&"*".to_string())
/// );
/// ```
pub fn apply(response: &mut Response) {
    response.add_header("Access-Control-Allow-Origin", ALLOW_ORIGIN);
    response.add_header("Access-Control-Allow-Methods", ALLOW_METHODS);
    response.add_header("Access-Control-Allow-Headers", ALLOW_HEADERS);
}
