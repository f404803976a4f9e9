// apps/backend/src/middleware/cors.rs
use actix_cors::Cors;
use actix_web::http::header;

/// CORS for the browser client.
///
/// Only GET is used over plain HTTP; the game itself runs over the
/// websocket upgrade, which is also a GET. With no configured origins the
/// localhost dev servers are allowed.
pub fn cors_middleware(origins: &[String]) -> Cors {
    let fallback = ["http://localhost:5173", "http://127.0.0.1:5173"];

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::HeaderName::from_static("x-trace-id")])
        .max_age(3600);

    if origins.is_empty() {
        for origin in fallback {
            cors = cors.allowed_origin(origin);
        }
    } else {
        for origin in origins {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}
