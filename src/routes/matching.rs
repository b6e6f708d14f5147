use crate::{
    auth::{AdminCaller, TalentCaller},
    engine::matching,
    error::AppError,
    models::{MatchInput, MatchQuery},
    state::AppState,
};
use actix_web::{get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

/// Matches a talent to a job on behalf of the calling admin.
///
/// ## Responses:
/// - `201 Created`: the match with its job, talent and admin.
/// - `400 Bad Request`: the user is not a talent, or the pair is already matched.
/// - `404 Not Found`: the job or the user does not exist.
#[post("")]
pub async fn create_match(
    state: web::Data<AppState>,
    AdminCaller(caller): AdminCaller,
    body: web::Json<MatchInput>,
) -> Result<impl Responder, AppError> {
    let created =
        matching::create_match(state.store.as_ref(), body.job_id, body.user_id, caller.id).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Lists matches for admins, optionally narrowed by `jobId`, `userId` or `status`.
#[get("")]
pub async fn get_matches(
    state: web::Data<AppState>,
    _admin: AdminCaller,
    query: web::Query<MatchQuery>,
) -> Result<impl Responder, AppError> {
    let matches = matching::find_matches(state.store.as_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(matches))
}

/// The calling talent's active matches.
#[get("/my-jobs")]
pub async fn my_jobs(
    state: web::Data<AppState>,
    TalentCaller(caller): TalentCaller,
) -> Result<impl Responder, AppError> {
    let matches = matching::list_matches_for_talent(state.store.as_ref(), caller.id, false).await?;
    Ok(HttpResponse::Ok().json(matches))
}

#[put("/{id}/complete")]
pub async fn complete_match(
    state: web::Data<AppState>,
    _admin: AdminCaller,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let completed = matching::complete_match(state.store.as_ref(), id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(completed))
}
