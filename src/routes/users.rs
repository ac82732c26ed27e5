use crate::{
    auth::{
        hash_password_blocking, verify_password_blocking, AuthResponse, AuthenticatedUser,
        LoginRequest, RegisterRequest, UpdatePasswordRequest,
    },
    error::AppError,
    models::User,
    state::AppState,
};
use actix_web::{get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

const AUTHENTICATION_FAILED: &str = "Authentication failed";

/// Register a new user
///
/// Hashes the password, stores the account and returns it together with a token.
/// There is no existence check up front; a duplicate email is refused by the store and
/// reported like any other failure.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let RegisterRequest {
        name,
        email,
        password,
    } = register_data.into_inner();

    let (user, token) = create_account(&state, name, email, password)
        .await
        .map_err(|e| e.context("Registration failed"))?;

    log::info!("registered user {}", user.id);
    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User registered successfully".into(),
        token,
        user,
    }))
}

async fn create_account(
    state: &AppState,
    name: String,
    email: String,
    password: String,
) -> Result<(User, String), AppError> {
    let password_hash = hash_password_blocking(password, state.bcrypt_cost).await?;
    let user = User::new(name, email, password_hash);
    state.store.insert_user(&user).await?;
    let token = state.jwt.issue(user.id)?;
    Ok((user, token))
}

/// Login user
///
/// An unknown email and a wrong password produce the same `401`, and both pay for one
/// bcrypt verification.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let (user, token) = authenticate(&state, &login_data)
        .await
        .map_err(|e| e.context("Login failed"))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Authentication successful".into(),
        token,
        user,
    }))
}

async fn authenticate(
    state: &AppState,
    credentials: &LoginRequest,
) -> Result<(User, String), AppError> {
    let user = state.store.find_user_by_email(&credentials.email).await?;
    let hash = match &user {
        Some(user) => user.password_hash.clone(),
        None => state.dummy_password_hash.clone(),
    };

    let verified = verify_password_blocking(credentials.password.clone(), hash).await?;
    let user = match user {
        Some(user) if verified => user,
        _ => return Err(AppError::Unauthorized(AUTHENTICATION_FAILED.into())),
    };

    let token = state.jwt.issue(user.id)?;
    Ok((user, token))
}

/// Change the caller's password
///
/// The current password has to be presented again.
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    body: web::Json<UpdatePasswordRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    change_password(&state, caller.id(), &body)
        .await
        .map_err(|e| e.context("Profile update failed"))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated successfully" })))
}

async fn change_password(
    state: &AppState,
    user_id: Uuid,
    body: &UpdatePasswordRequest,
) -> Result<(), AppError> {
    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !verify_password_blocking(body.old_password.clone(), user.password_hash.clone()).await? {
        return Err(AppError::Unauthorized("Old password is incorrect".into()));
    }

    let new_hash = hash_password_blocking(body.new_password.clone(), state.bcrypt_cost).await?;
    if !state.store.update_password(user.id, &new_hash).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    Ok(())
}

/// The caller's own user id
#[get("/me")]
pub async fn me(caller: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(json!({ "userId": caller.id() }))
}

/// Fetch any user by id
///
/// Open to every authenticated caller; the password hash is never part of the output.
#[get("/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    _caller: AuthenticatedUser,
    user_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let user = state
        .store
        .find_user_by_id(user_id.into_inner())
        .await
        .map_err(|e| e.context("Failed to fetch user data"))?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}
