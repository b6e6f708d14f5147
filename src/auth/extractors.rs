use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Role;

/// The authenticated caller, as resolved by `AuthMiddleware`.
///
/// If no identity is present in the request extensions (the middleware did not
/// run, or the route is public), extraction fails with `AppError::Unauthorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
}

fn caller_from(req: &HttpRequest) -> Result<Caller, AppError> {
    req.extensions().get::<Caller>().copied().ok_or_else(|| {
        AppError::Unauthorized("No authenticated user on this request".to_string())
    })
}

impl FromRequest for Caller {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(caller_from(req).map_err(Into::into))
    }
}

/// A caller with the Admin role. Anyone else gets 403.
#[derive(Debug, Clone, Copy)]
pub struct AdminCaller(pub Caller);

impl FromRequest for AdminCaller {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = caller_from(req).and_then(|caller| match caller.role {
            Role::Admin => Ok(AdminCaller(caller)),
            Role::Talent => Err(AppError::Forbidden(
                "Access denied. Admin role required.".to_string(),
            )),
        });
        ready(result.map_err(Into::into))
    }
}

/// A caller with the Talent role. Anyone else gets 403.
#[derive(Debug, Clone, Copy)]
pub struct TalentCaller(pub Caller);

impl FromRequest for TalentCaller {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = caller_from(req).and_then(|caller| match caller.role {
            Role::Talent => Ok(TalentCaller(caller)),
            Role::Admin => Err(AppError::Forbidden(
                "Access denied. Talent role required.".to_string(),
            )),
        });
        ready(result.map_err(Into::into))
    }
}
