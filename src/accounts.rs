//! Account use cases: registration, login, email verification and password
//! recovery.
//!
//! Passwords are hashed here, before a `User` is ever built or updated, so the
//! store only ever sees bcrypt hashes.

use chrono::Utc;
use uuid::Uuid;

use crate::auth::codes::{
    code_matches, generate_reset_token, generate_verification_code, hash_reset_token,
    reset_token_expiry, verification_code_expiry,
};
use crate::auth::{
    hash_password, verify_password, AuthResponse, LoginRequest, RegisterRequest, TokenService,
};
use crate::config::Config;
use crate::email::{password_change_email, password_reset_email, verification_email, Email, Mailer};
use crate::error::CoreError;
use crate::models::user::normalize_email;
use crate::models::{NewUser, ProfileUpdate, User, UserProfile};
use crate::store::Store;

/// Borrows the injected services for the length of one request.
pub struct Accounts<'a> {
    pub store: &'a dyn Store,
    pub mailer: &'a dyn Mailer,
    pub tokens: &'a TokenService,
    pub config: &'a Config,
}

impl<'a> Accounts<'a> {
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, CoreError> {
        let email = normalize_email(&request.email);
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(CoreError::UserAlreadyExists);
        }

        let password_hash = hash_password(&request.password, self.config.bcrypt_cost)?;
        let mut user = User::new(NewUser {
            name: request.name,
            email,
            password_hash,
            role: request.role.unwrap_or_default(),
            skills: request.skills.unwrap_or_default(),
            location: request.location,
        });
        let code = generate_verification_code();
        user.email_verification_code = Some(code.clone());
        user.email_verification_expires_at = Some(verification_code_expiry(user.created_at));

        // A concurrent registration can still lose here with DuplicateEmail.
        self.store.insert_user(&user).await?;
        log::info!("registered {:?} user {}", user.role, user.id);

        self.deliver(verification_email(&user.email, &code)).await;

        let token = self.tokens.generate_token(user.id, user.role)?;
        Ok(AuthResponse {
            message: "User registered successfully. Please verify your email.".to_string(),
            token,
            user: UserProfile::from(&user),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, CoreError> {
        let email = normalize_email(&request.email);
        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(CoreError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(CoreError::InvalidCredentials);
        }

        let token = self.tokens.generate_token(user.id, user.role)?;
        Ok(AuthResponse {
            message: "Login successful".to_string(),
            token,
            user: UserProfile::from(&user),
        })
    }

    pub async fn verify_email(&self, user_id: Uuid, code: &str) -> Result<UserProfile, CoreError> {
        let mut user = self.load(user_id).await?;
        if user.is_email_verified {
            return Err(CoreError::EmailAlreadyVerified);
        }
        if !code_matches(
            user.email_verification_code.as_deref(),
            user.email_verification_expires_at,
            code,
            Utc::now(),
        ) {
            return Err(CoreError::InvalidVerificationCode);
        }

        user.is_email_verified = true;
        user.email_verification_code = None;
        user.email_verification_expires_at = None;
        self.save(&mut user).await?;
        log::info!("user {} verified their email", user.id);
        Ok(UserProfile::from(&user))
    }

    pub async fn resend_verification(&self, user_id: Uuid) -> Result<(), CoreError> {
        let mut user = self.load(user_id).await?;
        if user.is_email_verified {
            return Err(CoreError::EmailAlreadyVerified);
        }
        let code = self.issue_code(&mut user).await?;
        self.deliver(verification_email(&user.email, &code)).await;
        Ok(())
    }

    /// Succeeds whether or not the address belongs to an account.
    pub async fn forgot_password(&self, email: &str) -> Result<(), CoreError> {
        let email = normalize_email(email);
        let mut user = match self.store.find_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                log::debug!("password reset requested for unknown address");
                return Ok(());
            }
        };

        let token = generate_reset_token();
        user.password_reset_token_hash = Some(token.hash);
        user.password_reset_expires_at = Some(reset_token_expiry(Utc::now()));
        self.save(&mut user).await?;

        self.deliver(password_reset_email(
            &user.email,
            &self.config.frontend_url,
            &token.raw,
        ))
        .await;
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), CoreError> {
        let hash = hash_reset_token(token.trim());
        let mut user = self
            .store
            .find_user_by_reset_token(&hash, Utc::now())
            .await?
            .ok_or(CoreError::InvalidResetToken)?;

        user.password_hash = hash_password(password, self.config.bcrypt_cost)?;
        user.password_reset_token_hash = None;
        user.password_reset_expires_at = None;
        self.save(&mut user).await?;
        log::info!("password reset for user {}", user.id);
        Ok(())
    }

    /// Issues a fresh one-time code for a password change and emails it.
    pub async fn request_password_change_otp(&self, user_id: Uuid) -> Result<(), CoreError> {
        let mut user = self.load(user_id).await?;
        let code = self.issue_code(&mut user).await?;
        self.deliver(password_change_email(&user.email, &code)).await;
        Ok(())
    }

    pub async fn change_password_with_otp(
        &self,
        user_id: Uuid,
        otp: &str,
        new_password: &str,
    ) -> Result<(), CoreError> {
        let mut user = self.load(user_id).await?;
        if !code_matches(
            user.email_verification_code.as_deref(),
            user.email_verification_expires_at,
            otp,
            Utc::now(),
        ) {
            return Err(CoreError::InvalidVerificationCode);
        }

        user.password_hash = hash_password(new_password, self.config.bcrypt_cost)?;
        user.email_verification_code = None;
        user.email_verification_expires_at = None;
        self.save(&mut user).await?;
        log::info!("password changed for user {}", user.id);
        Ok(())
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, CoreError> {
        let user = self.load(user_id).await?;
        Ok(UserProfile::from(&user))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<UserProfile, CoreError> {
        let mut user = self.load(user_id).await?;
        user.apply_update(update);
        self.save(&mut user).await?;
        Ok(UserProfile::from(&user))
    }

    async fn load(&self, user_id: Uuid) -> Result<User, CoreError> {
        self.store
            .find_user(user_id)
            .await?
            .ok_or(CoreError::UserNotFound)
    }

    async fn save(&self, user: &mut User) -> Result<(), CoreError> {
        user.updated_at = Utc::now();
        if !self.store.update_user(user).await? {
            return Err(CoreError::UserNotFound);
        }
        Ok(())
    }

    async fn issue_code(&self, user: &mut User) -> Result<String, CoreError> {
        let code = generate_verification_code();
        user.email_verification_code = Some(code.clone());
        user.email_verification_expires_at = Some(verification_code_expiry(Utc::now()));
        self.save(user).await?;
        Ok(code)
    }

    /// Email failures never fail the request that triggered them.
    async fn deliver(&self, email: Email) {
        if let Err(err) = self.mailer.send(&email).await {
            log::error!("failed to send \"{}\" to {}: {}", email.subject, email.to, err);
        }
    }
}
