use actix_web::{web, App, HttpServer};
use drieslag::config::GameConfig;
use drieslag::middleware::cors::cors_middleware;
use drieslag::middleware::request_trace::RequestTrace;
use drieslag::middleware::structured_logger::StructuredLogger;
use drieslag::state::app_state::AppState;
use drieslag::{routes, telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match GameConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    let (host, port) = (config.host.clone(), config.port);

    tracing::info!(
        host = %host,
        port,
        round_pause_ms = config.round_pause.as_millis() as u64,
        exchange_pause_ms = config.exchange_pause.as_millis() as u64,
        chooser = ?config.chooser,
        "starting drieslag server"
    );

    let data = web::Data::new(AppState::new(config));

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&data.config.cors_origins))
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
