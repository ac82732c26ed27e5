#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{http::header, test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

use taskboard::auth::{AuthMiddleware, JwtKeys};
use taskboard::routes;
use taskboard::state::AppState;
use taskboard::store::MemoryStore;

pub const TEST_SECRET: &str = "integration-test-secret";
/// bcrypt's minimum cost keeps the suites fast.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_state() -> AppState {
    test_state_with_cost(TEST_BCRYPT_COST)
}

pub fn test_state_with_cost(bcrypt_cost: u32) -> AppState {
    let _ = env_logger::builder().is_test(true).try_init();
    AppState::new(
        Arc::new(MemoryStore::new()),
        JwtKeys::new(TEST_SECRET),
        bcrypt_cost,
    )
    .expect("test state")
}

/// The application exactly as `main` assembles it, over the given state.
pub async fn test_app(
    state: AppState,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(routes::json_config())
            .wrap(AuthMiddleware)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await
}

pub struct TestUser {
    pub id: String,
    pub token: String,
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Sends `req` and returns the status with the parsed JSON body.
pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (actix_web::http::StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

pub async fn register_user<S, B>(app: &S, name: &str, email: &str, password: &str) -> TestUser
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/users/register")
        .set_json(json!({ "name": name, "email": email, "password": password }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, 201, "registration failed: {}", body);

    TestUser {
        id: body["user"]["id"].as_str().expect("user id").to_string(),
        token: body["token"].as_str().expect("token").to_string(),
    }
}

pub async fn create_task<S, B>(app: &S, user: &TestUser, title: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/tasks")
        .append_header(bearer(&user.token))
        .set_json(json!({
            "title": title,
            "priority": "high",
            "checklist": [],
            "dueDate": "2025-01-01"
        }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, 201, "task creation failed: {}", body);
    body["task"].clone()
}
