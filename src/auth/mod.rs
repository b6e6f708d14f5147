pub mod codes;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Role, UserProfile};

// Re-export necessary items
pub use extractors::{AdminCaller, Caller, TalentCaller};
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

lazy_static! {
    // Six digits, as produced by codes::generate_verification_code.
    static ref CODE_REGEX: regex::Regex = regex::Regex::new(r"^\s*[0-9]{6}\s*$").unwrap();
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
    /// Defaults to Talent.
    pub role: Option<Role>,
    pub skills: Option<Vec<String>>,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
}

/// A 6-digit code sent by email.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(regex(path = "CODE_REGEX", message = "Verification code must be 6 digits"))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(regex(path = "CODE_REGEX", message = "OTP must be 6 digits"))]
    pub otp: String,
    #[validate(length(min = 6))]
    pub new_password: String,
}

/// Response after registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    /// The JWT for session authentication.
    pub token: String,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_login_request_validation() {
        let valid_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid_login.validate().is_ok());

        let invalid_email_login = LoginRequest {
            email: "testexample.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(invalid_email_login.validate().is_err());
    }

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
            role: None,
            skills: None,
            location: "Austin".to_string(),
        };
        assert!(valid.validate().is_ok());

        let missing_location = RegisterRequest {
            location: "".to_string(),
            ..valid
        };
        assert!(missing_location.validate().is_err());

        let short_password = RegisterRequest {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password: "short".to_string(),
            role: Some(Role::Admin),
            skills: Some(vec!["Rust".to_string()]),
            location: "Austin".to_string(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_code_validation() {
        assert!(VerifyEmailRequest {
            code: "123456".to_string()
        }
        .validate()
        .is_ok());
        assert!(VerifyEmailRequest {
            code: "12345".to_string()
        }
        .validate()
        .is_err());
        assert!(ChangePasswordRequest {
            otp: "12a456".to_string(),
            new_password: "new-password".to_string(),
        }
        .validate()
        .is_err());
    }
}
