use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::errors::DomainError;
use crate::services::room_actor::Summarize;
use crate::state::app_state::AppState;
use crate::utils::join_code::normalize_room_code;

/// Public lobby summary, for a join screen to preview a code.
async fn room_summary(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let code = normalize_room_code(&path.into_inner());
    let addr = app_state
        .rooms
        .get(&code)
        .ok_or_else(|| DomainError::room_not_found(&code))?;
    // A room that stopped after the lookup is gone as well.
    let summary = addr
        .send(Summarize)
        .await
        .map_err(|_| DomainError::room_not_found(&code))?;
    Ok(HttpResponse::Ok().json(summary))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{code}", web::get().to(room_summary));
}
