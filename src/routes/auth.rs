use crate::{
    auth::{
        Caller, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
        ResetPasswordRequest, VerifyEmailRequest,
    },
    error::AppError,
    models::ProfileUpdate,
    state::AppState,
};
use actix_web::{get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Creates an unverified account, emails a verification code and returns an
/// authentication token.
///
/// ## Responses:
/// - `201 Created`: `AuthResponse` with token and profile.
/// - `400 Bad Request`: the email is already registered.
/// - `422 Unprocessable Entity`: validation failed.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let response = state.accounts().register(register_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Login user
///
/// Authenticates a user and returns an authentication token. Unknown email and
/// wrong password produce the same error.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;
    let response = state.accounts().login(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/verify-email")]
pub async fn verify_email(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<VerifyEmailRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    let user = state.accounts().verify_email(caller.id, &body.code).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Email verified successfully",
        "user": user
    })))
}

#[post("/resend-verification")]
pub async fn resend_verification(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<impl Responder, AppError> {
    state.accounts().resend_verification(caller.id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Verification code sent"
    })))
}

/// Always answers with the same message so callers cannot probe for accounts.
#[post("/forgot-password")]
pub async fn forgot_password(
    state: web::Data<AppState>,
    body: web::Json<ForgotPasswordRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    state.accounts().forgot_password(&body.email).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "If that email is registered, a reset link has been sent"
    })))
}

#[post("/reset-password")]
pub async fn reset_password(
    state: web::Data<AppState>,
    body: web::Json<ResetPasswordRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    state
        .accounts()
        .reset_password(&body.token, &body.password)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Password reset successfully"
    })))
}

#[get("/me")]
pub async fn me(state: web::Data<AppState>, caller: Caller) -> Result<impl Responder, AppError> {
    let user = state.accounts().profile(caller.id).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Partially updates the caller's profile. Empty fields are ignored.
#[put("/me")]
pub async fn update_me(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<ProfileUpdate>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    let user = state
        .accounts()
        .update_profile(caller.id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

#[post("/change-password-otp")]
pub async fn change_password_otp(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<impl Responder, AppError> {
    state.accounts().request_password_change_otp(caller.id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "A verification code has been sent to your email"
    })))
}

#[post("/verify-otp-change-password")]
pub async fn verify_otp_change_password(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<ChangePasswordRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    state
        .accounts()
        .change_password_with_otp(caller.id, &body.otp, &body.new_password)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Password changed successfully"
    })))
}
