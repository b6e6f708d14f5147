//! Outbound transactional email.
//!
//! Delivery goes through the Brevo HTTP API when it is configured. Otherwise
//! messages are written to the log, which is enough for local development.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use crate::config::EmailConfig;

const BREVO_ENDPOINT: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email transport failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("email provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// A rendered message ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

/// Sends through the Brevo API, retrying with exponential backoff.
pub struct BrevoMailer {
    client: reqwest::Client,
    config: EmailConfig,
    endpoint: String,
    attempts: u32,
    base_delay: Duration,
}

impl BrevoMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self::with_endpoint(config, BREVO_ENDPOINT, Duration::from_secs(1))
    }

    pub fn with_endpoint(config: EmailConfig, endpoint: &str, base_delay: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            endpoint: endpoint.to_string(),
            attempts: 3,
            base_delay,
        }
    }

    async fn send_once(&self, email: &Email) -> Result<(), MailError> {
        let body = json!({
            "sender": { "name": self.config.from_name, "email": self.config.from_email },
            "to": [{ "email": email.to }],
            "subject": email.subject,
            "htmlContent": email.html,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(MailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Mailer for BrevoMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let mut attempt = 0;
        loop {
            match self.send_once(email).await {
                Ok(()) => {
                    log::info!("email \"{}\" sent to {}", email.subject, email.to);
                    return Ok(());
                }
                Err(err) if attempt + 1 < self.attempts => {
                    let delay = self.base_delay * 2u32.pow(attempt + 1);
                    log::warn!(
                        "email to {} failed (attempt {}): {}; retrying in {:?}",
                        email.to,
                        attempt + 1,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        log::info!(
            "email delivery disabled; to={} subject=\"{}\"\n{}",
            email.to,
            email.subject,
            email.html
        );
        Ok(())
    }
}

pub fn verification_email(to: &str, code: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Verify your email".to_string(),
        html: format!(
            "<p>Your verification code is <strong>{}</strong>.</p>\
             <p>It expires in 10 minutes.</p>",
            code
        ),
    }
}

pub fn password_change_email(to: &str, code: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Your password change code".to_string(),
        html: format!(
            "<p>Use the code <strong>{}</strong> to change your password.</p>\
             <p>It expires in 10 minutes. If you did not ask for this, ignore this email.</p>",
            code
        ),
    }
}

pub fn password_reset_email(to: &str, frontend_url: &str, raw_token: &str) -> Email {
    let link = format!("{}/reset-password?token={}", frontend_url, raw_token);
    Email {
        to: to.to_string(),
        subject: "Reset your password".to_string(),
        html: format!(
            "<p>Follow <a href=\"{link}\">{link}</a> to choose a new password.</p>\
             <p>The link expires in 1 hour.</p>",
            link = link
        ),
    }
}
