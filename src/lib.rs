#![doc = "The `talentmatch` library crate."]
#![doc = ""]
#![doc = "Job matching backend: admins post jobs and match talents to them, talents"]
#![doc = "follow their matches, and both sides get dashboard statistics. The binary"]
#![doc = "(`main.rs`) wires configuration, the store and the mailer into an actix-web"]
#![doc = "server; everything else lives here so integration tests can build the same app."]

pub mod accounts;
pub mod auth;
pub mod config;
pub mod email;
pub mod engine;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::config::Config;
pub use crate::error::{AppError, CoreError};
pub use crate::state::AppState;
