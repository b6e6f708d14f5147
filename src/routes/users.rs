use crate::{auth::AdminCaller, error::AppError, models::UserProfile, state::AppState};
use actix_web::{get, web, HttpResponse, Responder};

/// Every account, without credentials.
#[get("")]
pub async fn get_users(
    state: web::Data<AppState>,
    _admin: AdminCaller,
) -> Result<impl Responder, AppError> {
    let users: Vec<UserProfile> = state
        .store
        .list_users()
        .await?
        .iter()
        .map(UserProfile::from)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}
