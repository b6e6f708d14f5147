use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use talentmatch::auth::AuthMiddleware;
use talentmatch::email::{BrevoMailer, LogMailer, Mailer};
use talentmatch::routes::{self, health};
use talentmatch::store::{MemoryStore, PgStore, Store};
use talentmatch::{AppState, Config};

fn startup_error(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections)
                .await
                .map_err(startup_error)?;
            log::info!("connected to PostgreSQL");
            Arc::new(store)
        }
        None => {
            log::warn!("DATABASE_URL is not set; data is kept in memory and lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let mailer: Arc<dyn Mailer> = match &config.email {
        Some(email) => Arc::new(BrevoMailer::new(email.clone())),
        None => {
            log::warn!("BREVO_API_KEY is not set; emails are logged instead of sent");
            Arc::new(LogMailer)
        }
    };

    let bind = (config.server_host.clone(), config.server_port);
    log::info!("Starting talentmatch server at {}", config.server_url());

    let state = AppState::new(store, mailer, config);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(state.tokens.clone()))
                    .configure(routes::config),
            )
    })
    .bind(bind)?
    .run()
    .await
}
