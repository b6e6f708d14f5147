pub mod admin;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod matching;
pub mod talent;
pub mod users;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::error::AppError;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
}

fn path_error(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid path parameter: {}", err)).into()
}

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid query string: {}", err)).into()
}

/// Everything mounted under `/api`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login)
                .service(auth::verify_email)
                .service(auth::resend_verification)
                .service(auth::forgot_password)
                .service(auth::reset_password)
                .service(auth::me)
                .service(auth::update_me)
                .service(auth::change_password_otp)
                .service(auth::verify_otp_change_password),
        )
        .service(
            web::scope("/jobs")
                .service(jobs::get_jobs)
                .service(jobs::create_job)
                .service(jobs::get_job)
                .service(jobs::update_job)
                .service(jobs::delete_job),
        )
        .service(
            web::scope("/matching")
                .service(matching::create_match)
                .service(matching::get_matches)
                .service(matching::my_jobs)
                .service(matching::complete_match),
        )
        .service(
            web::scope("/talent")
                .service(talent::my_matches)
                .service(talent::my_stats),
        )
        .service(web::scope("/admin").service(admin::admin_stats))
        .service(web::scope("/users").service(users::get_users));
}
