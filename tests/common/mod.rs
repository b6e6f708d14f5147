#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};

use talentmatch::email::{Email, MailError, Mailer};
use talentmatch::routes::{self, health};
use talentmatch::store::MemoryStore;
use talentmatch::{AppState, Config};

/// Keeps every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
}

impl RecordingMailer {
    pub fn last_to(&self, to: &str) -> Email {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|email| email.to == to)
            .cloned()
            .unwrap_or_else(|| panic!("no email sent to {}", to))
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub struct TestContext {
    pub state: AppState,
    pub outbox: Arc<RecordingMailer>,
}

pub fn context() -> TestContext {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some("integration-test-secret".to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        _ => None,
    })
    .expect("test config");
    let outbox = Arc::new(RecordingMailer::default());
    let state = AppState::new(Arc::new(MemoryStore::new()), outbox.clone(), config);
    TestContext { state, outbox }
}

/// The same application `main` serves, over the given state.
pub fn app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let tokens = state.tokens.clone();
    App::new()
        .app_data(web::Data::new(state))
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
                .wrap(talentmatch::auth::AuthMiddleware::new(tokens))
                .configure(routes::config),
        )
}

/// Sends a request and returns the status and JSON body.
///
/// Errors raised by middleware (before any handler runs) are rendered the same
/// way the server would render them.
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: actix_http::Request,
) -> (StatusCode, Value) {
    let (status, bytes) = match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            (status, test::read_body(resp).await)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let bytes = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            (status, bytes)
        }
    };
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn get(uri: &str, token: Option<&str>) -> actix_http::Request {
    with_token(test::TestRequest::get().uri(uri), token).to_request()
}

pub fn delete(uri: &str, token: Option<&str>) -> actix_http::Request {
    with_token(test::TestRequest::delete().uri(uri), token).to_request()
}

pub fn post(uri: &str, token: Option<&str>, body: Value) -> actix_http::Request {
    with_token(test::TestRequest::post().uri(uri), token)
        .set_json(body)
        .to_request()
}

pub fn put(uri: &str, token: Option<&str>, body: Value) -> actix_http::Request {
    with_token(test::TestRequest::put().uri(uri), token)
        .set_json(body)
        .to_request()
}

fn with_token(req: test::TestRequest, token: Option<&str>) -> test::TestRequest {
    match token {
        Some(token) => req.insert_header(("Authorization", format!("Bearer {}", token))),
        None => req,
    }
}

/// A registered account as seen by the tests.
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

pub async fn register(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
    role: &str,
    skills: &[&str],
    location: &str,
) -> TestUser {
    let (status, body) = send(
        app,
        post(
            "/api/auth/register",
            None,
            json!({
                "name": name,
                "email": email,
                "password": "Password123!",
                "role": role,
                "skills": skills,
                "location": location
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);
    TestUser {
        id: body["user"]["id"].as_str().unwrap().to_string(),
        email: email.to_string(),
        token: body["token"].as_str().unwrap().to_string(),
    }
}

pub async fn create_job(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    admin: &TestUser,
    title: &str,
    skills: &[&str],
    location: &str,
) -> String {
    let (status, body) = send(
        app,
        post(
            "/api/jobs",
            Some(&admin.token),
            json!({
                "title": title,
                "description": format!("{} role", title),
                "requiredSkills": skills,
                "location": location
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "job creation failed: {}", body);
    body["id"].as_str().unwrap().to_string()
}

/// The 6-digit code in a verification or password change email.
pub fn code_in(email: &Email) -> String {
    let re = regex::Regex::new(r"<strong>(\d{6})</strong>").unwrap();
    re.captures(&email.html).expect("no code in email")[1].to_string()
}
