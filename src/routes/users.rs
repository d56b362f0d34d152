use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

use crate::{
    auth::{LoginRequest, LoginResponse, PasswordHasher, RegisterRequest, TokenService},
    error::AppError,
    models::NewUser,
    store::UserStore,
};

/// Register a new user
///
/// Stores the user with a bcrypt digest of the password. Nothing about the
/// new account is echoed back.
///
/// ## Responses:
/// - `201 Created`: `{"message": "User registered successfully!"}`
/// - `400 Bad Request`: email, password or name missing or empty.
/// - `409 Conflict`: the email is already registered.
/// - `500 Internal Server Error`: store or hashing failure.
#[post("/register")]
pub async fn register(
    users: web::Data<dyn UserStore>,
    hasher: web::Data<PasswordHasher>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let request = register_data.into_inner();
    request.validate().map_err(|_| {
        AppError::ValidationError("Email, password, and name are required".into())
    })?;

    if users.find_by_email(&request.email).await?.is_some() {
        log::info!("Registration rejected: email already registered");
        return Err(AppError::Conflict("User already exists".into()));
    }

    let hasher = **hasher;
    let password = request.password;
    let password_hash = web::block(move || hasher.hash(&password)).await??;

    // The store re-checks uniqueness, so a concurrent registration still
    // ends in 409 rather than a second record.
    let user = users
        .insert(NewUser {
            email: request.email,
            password_hash,
            name: request.name,
        })
        .await?;
    log::info!("Registered user {}", user.id);

    Ok(HttpResponse::Created().json(json!({ "message": "User registered successfully!" })))
}

/// Login user
///
/// Verifies the password against the stored digest and issues a token.
///
/// ## Responses:
/// - `200 OK`: `{"token": "<jwt>"}`
/// - `400 Bad Request`: email or password missing, or the password does not match.
/// - `404 Not Found`: no user has this email.
/// - `500 Internal Server Error`: store, hashing or signing failure.
#[post("/login")]
pub async fn login(
    users: web::Data<dyn UserStore>,
    hasher: web::Data<PasswordHasher>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let request = login_data.into_inner();
    request
        .validate()
        .map_err(|_| AppError::ValidationError("Email and password are required".into()))?;

    let user = users
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let hasher = **hasher;
    let password = request.password;
    let stored_hash = user.password_hash.clone();
    let matches = web::block(move || hasher.verify(&password, &stored_hash)).await??;
    if !matches {
        log::warn!("Failed login for user {}", user.id);
        return Err(AppError::InvalidCredentials("Invalid credentials".into()));
    }

    let token = tokens.issue(user.id)?;
    log::info!("User {} logged in", user.id);

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}
