use crate::{auth::AdminCaller, engine::stats, error::AppError, state::AppState};
use actix_web::{get, web, HttpResponse, Responder};

/// System-wide dashboard numbers.
#[get("/stats")]
pub async fn admin_stats(
    state: web::Data<AppState>,
    _admin: AdminCaller,
) -> Result<impl Responder, AppError> {
    let stats = stats::compute_admin_stats(state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}
