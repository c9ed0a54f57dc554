use axum::http::{StatusCode, header};
use axum::{Json, extract::State};
use axum::http::HeaderMap;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use portal_api::{ApiResponse, CredentialsInput, PasswordResetInput, Role, SignUpInput, TokenPair, User};

use crate::error::{AppError, AppResult};
use crate::handlers::{ack, ok};
use crate::state::{AppState, DemoUser};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthData {
    user: User,
    tokens: TokenPair,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifyRequest {
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EmailRequest {
    email: String,
}

pub(crate) async fn sign_in(
    State(state): State<AppState>,
    Json(input): Json<CredentialsInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthData>>)> {
    input.validate()?;

    let db = state.db.lock().expect("db lock poisoned");
    let entry = db
        .user_by_email(&input.email)
        .filter(|entry| entry.password == input.password)
        .ok_or_else(|| AppError::BadRequest("invalid email or password".to_string()))?;
    let user = entry.user.clone();
    drop(db);

    let tokens = state
        .jwt
        .generate_pair(&user)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    Ok(ok(
        StatusCode::OK,
        "signed in",
        AuthData { user, tokens },
    ))
}

pub(crate) async fn sign_up(
    State(state): State<AppState>,
    Json(input): Json<SignUpInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    input.validate()?;

    let mut db = state.db.lock().expect("db lock poisoned");
    if db.user_by_email(&input.email).is_some() {
        return Err(AppError::Conflict("email is already registered".to_string()));
    }

    let id = db.next_id();
    let user = User {
        id,
        email: input.email,
        name: input.name,
        role: Role::Reader,
        verified: false,
        avatar_url: None,
        created_at: Utc::now(),
    };
    db.users.push(DemoUser {
        user: user.clone(),
        password: input.password,
    });

    Ok(ok(StatusCode::CREATED, "check your inbox to verify the email", user))
}

/// Mock convention: the verification token is the user's email.
pub(crate) async fn verify_email(
    State(state): State<AppState>,
    Json(input): Json<VerifyRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthData>>)> {
    let mut db = state.db.lock().expect("db lock poisoned");
    let entry = db
        .users
        .iter_mut()
        .find(|entry| entry.user.email == input.token)
        .ok_or(AppError::NotFound("verification token"))?;
    entry.user.verified = true;
    let user = entry.user.clone();
    drop(db);

    let tokens = state
        .jwt
        .generate_pair(&user)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    Ok(ok(StatusCode::OK, "email verified", AuthData { user, tokens }))
}

pub(crate) async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<(StatusCode, Json<ApiResponse<TokenPair>>)> {
    let token = bearer_token(&headers)?;
    let claims = state
        .jwt
        .verify_token(token)
        .map_err(|_| AppError::Unauthorized)?;
    let user_id: i64 = claims.sub.parse().map_err(|_| AppError::Unauthorized)?;

    let user = state
        .db
        .lock()
        .expect("db lock poisoned")
        .user_by_id(user_id)
        .ok_or(AppError::Unauthorized)?;

    let tokens = state
        .jwt
        .generate_pair(&user)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    Ok(ok(StatusCode::OK, "tokens refreshed", tokens))
}

pub(crate) async fn sign_out() -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    ack(StatusCode::OK, "signed out")
}

pub(crate) async fn forgot_password(
    Json(input): Json<EmailRequest>,
) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    // Same answer whether the email exists or not.
    tracing::debug!("password reset requested for {}", input.email);
    ack(StatusCode::OK, "reset instructions sent if the email is registered")
}

/// Mock convention: the reset token is the user's email.
pub(crate) async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<PasswordResetInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
    input.validate()?;

    let mut db = state.db.lock().expect("db lock poisoned");
    let entry = db
        .users
        .iter_mut()
        .find(|entry| entry.user.email == input.token)
        .ok_or(AppError::NotFound("reset token"))?;
    entry.password = input.password;

    Ok(ack(StatusCode::OK, "password updated"))
}

pub(crate) async fn resend_verification(
    Json(input): Json<EmailRequest>,
) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    tracing::debug!("verification email re-requested for {}", input.email);
    ack(StatusCode::OK, "verification email sent")
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let mut parts = raw.split_whitespace();
    let scheme = parts.next().ok_or(AppError::Unauthorized)?;
    let token = parts.next().ok_or(AppError::Unauthorized)?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized);
    }
    Ok(token)
}
