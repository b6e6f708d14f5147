use crate::{
    auth::TalentCaller,
    engine::{matching, stats},
    error::AppError,
    state::AppState,
};
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;

/// Every match of the calling talent, newest first, whatever its status.
#[get("/matches")]
pub async fn my_matches(
    state: web::Data<AppState>,
    TalentCaller(caller): TalentCaller,
) -> Result<impl Responder, AppError> {
    let matches = matching::list_matches_for_talent(state.store.as_ref(), caller.id, true).await?;
    Ok(HttpResponse::Ok().json(matches))
}

/// Dashboard numbers for the calling talent.
#[get("/stats")]
pub async fn my_stats(
    state: web::Data<AppState>,
    TalentCaller(caller): TalentCaller,
) -> Result<impl Responder, AppError> {
    let stats = stats::compute_talent_stats(state.store.as_ref(), caller.id, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(stats))
}
