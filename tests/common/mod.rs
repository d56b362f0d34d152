#![allow(dead_code)]

use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use serde_json::json;
use taskboard::auth::{LoginResponse, PasswordHasher, TokenService};
use taskboard::config::{JwtConfig, OwnershipPolicy};
use taskboard::store::{MemoryTaskStore, MemoryUserStore};
use taskboard::{TaskService, UserService};

pub const SECRET: &str = "integration-test-secret";

pub fn jwt_config(secret: &str) -> JwtConfig {
    JwtConfig {
        secret: secret.to_string(),
        previous_secrets: vec![],
        ttl_seconds: 3600,
    }
}

pub fn token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(&jwt_config(SECRET)))
}

/// A user service over a fresh in-memory store, with the cheapest bcrypt cost.
pub fn user_service() -> (UserService, Arc<MemoryUserStore>) {
    let store = Arc::new(MemoryUserStore::new());
    let service = UserService::new(store.clone(), token_service(), PasswordHasher::new(4));
    (service, store)
}

pub fn task_service(policy: OwnershipPolicy) -> (TaskService, Arc<MemoryTaskStore>) {
    let store = Arc::new(MemoryTaskStore::new());
    let service = TaskService::new(store.clone(), token_service(), policy);
    (service, store)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Registers a user through the user-service routes and returns a login token.
pub async fn register_and_login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    name: &str,
    password: &str,
) -> Result<String, String> {
    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({ "email": email, "password": password, "name": name }))
        .to_request();
    let resp = test::call_service(app, req).await;
    if resp.status() != StatusCode::CREATED {
        return Err(format!("Failed to register user. Status: {}", resp.status()));
    }

    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    if status != StatusCode::OK {
        return Err(format!(
            "Failed to log in. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    let login: LoginResponse = serde_json::from_slice(&body)
        .map_err(|e| format!("Failed to parse login response: {}", e))?;
    Ok(login.token)
}
