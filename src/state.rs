use std::sync::Arc;

use crate::accounts::Accounts;
use crate::auth::TokenService;
use crate::config::Config;
use crate::email::Mailer;
use crate::store::Store;

/// Shared services handed to every handler through `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub mailer: Arc<dyn Mailer>,
    pub tokens: TokenService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, mailer: Arc<dyn Mailer>, config: Config) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expiry_hours);
        Self {
            store,
            mailer,
            tokens,
            config: Arc::new(config),
        }
    }

    pub fn accounts(&self) -> Accounts<'_> {
        Accounts {
            store: self.store.as_ref(),
            mailer: self.mailer.as_ref(),
            tokens: &self.tokens,
            config: &self.config,
        }
    }
}
