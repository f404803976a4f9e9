use actix_web::web;

pub mod health;
pub mod realtime;
pub mod rooms;

/// Register every route. `main` adds the middleware stack around it.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root));
    cfg.configure(health::configure_routes);
    cfg.service(web::scope("/api/rooms").configure(rooms::configure_routes));
    cfg.configure(realtime::configure_routes);
}
