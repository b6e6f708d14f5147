use crate::{
    auth::AdminCaller,
    error::{AppError, CoreError},
    models::{Job, JobInput},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Lists every job with its creator. Public.
#[get("")]
pub async fn get_jobs(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let jobs = state.store.list_job_details().await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// Retrieves a single job by its ID. Public.
///
/// ## Responses:
/// - `200 OK`: the job with its creator.
/// - `404 Not Found`: no job has this ID.
#[get("/{id}")]
pub async fn get_job(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let job = state
        .store
        .job_details(id.into_inner())
        .await?
        .ok_or(CoreError::JobNotFound)?;
    Ok(HttpResponse::Ok().json(job))
}

/// Creates a job posted by the calling admin.
///
/// ## Request Body:
/// - `title`, `description`, `location`: required.
/// - `requiredSkills` (optional): defaults to an empty list.
///
/// ## Responses:
/// - `201 Created`: the new job with its creator.
/// - `403 Forbidden`: the caller is not an admin.
/// - `422 Unprocessable Entity`: validation failed.
#[post("")]
pub async fn create_job(
    state: web::Data<AppState>,
    AdminCaller(caller): AdminCaller,
    job_data: web::Json<JobInput>,
) -> Result<impl Responder, AppError> {
    job_data.validate()?;

    let job = Job::new(job_data.into_inner(), caller.id);
    state.store.insert_job(&job).await?;
    log::info!("job {} created by {}", job.id, caller.id);

    let details = state
        .store
        .job_details(job.id)
        .await?
        .ok_or(CoreError::JobNotFound)?;
    Ok(HttpResponse::Created().json(details))
}

/// Replaces a job's title, description, skills and location.
#[put("/{id}")]
pub async fn update_job(
    state: web::Data<AppState>,
    _admin: AdminCaller,
    id: web::Path<Uuid>,
    job_data: web::Json<JobInput>,
) -> Result<impl Responder, AppError> {
    job_data.validate()?;
    let id = id.into_inner();

    let mut job = state
        .store
        .find_job(id)
        .await?
        .ok_or(CoreError::JobNotFound)?;
    job.apply(job_data.into_inner());
    if !state.store.update_job(&job).await? {
        return Err(CoreError::JobNotFound.into());
    }

    let details = state
        .store
        .job_details(id)
        .await?
        .ok_or(CoreError::JobNotFound)?;
    Ok(HttpResponse::Ok().json(details))
}

/// Deletes a job and every match made against it.
#[delete("/{id}")]
pub async fn delete_job(
    state: web::Data<AppState>,
    AdminCaller(caller): AdminCaller,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let id = id.into_inner();
    if !state.store.delete_job(id).await? {
        return Err(CoreError::JobNotFound.into());
    }
    log::info!("job {} deleted by {}", id, caller.id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "Job deleted successfully"
    })))
}
