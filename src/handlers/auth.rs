use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::{Value, json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    auth::{AuthUser, Claims, client_ip, hash_password, verify_password},
    error::{AppError, Result},
    models::{LoginRequest, RegisterRequest, User, UserResponse},
};

pub async fn register(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    // Validate input
    payload.validate()?;

    // Check if username already exists
    let existing_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(&payload.username)
        .fetch_optional(&state.db)
        .await?;

    if existing_user.is_some() {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    // Check if email already exists (if provided)
    if let Some(ref email) = payload.email {
        let existing_email = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&state.db)
            .await?;

        if existing_email.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }
    }

    // Hash password
    let password_hash = hash_password(&payload.password)?;

    // Create user, logged in from the start
    let user_id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, email, password_hash, created_at, updated_at, last_login_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(now)
    .bind(now)
    .bind(now)
    .fetch_one(&state.db)
    .await?;

    // Generate JWT token so the new user is logged in on success
    let (token, _claims) = Claims::new(user.id, user.username.clone(), &state.config.jwt_secret)?;

    tracing::info!(
        ip = %client_ip(&headers, peer),
        username = %user.username,
        "new user registered and logged in"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "token": token,
            "user": UserResponse::from(user)
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    // Find user by username
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(&payload.username)
        .fetch_optional(&state.db)
        .await?;

    let user = user.ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

    // Verify password
    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Authentication("Invalid credentials".to_string()));
    }

    // Update last login
    sqlx::query("UPDATE users SET last_login_at = $1 WHERE id = $2")
        .bind(chrono::Utc::now())
        .bind(user.id)
        .execute(&state.db)
        .await?;

    // Generate JWT token
    let (token, _claims) = Claims::new(user.id, user.username.clone(), &state.config.jwt_secret)?;

    tracing::info!(
        ip = %client_ip(&headers, peer),
        username = %user.username,
        "user logged in"
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Login successful",
            "token": token,
            "user": UserResponse::from(user)
        })),
    ))
}

pub async fn logout(
    auth_user: AuthUser,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Value>)> {
    // Sessions are stateless JWTs; the event is logged and the client
    // discards its token
    tracing::info!(
        ip = %client_ip(&headers, peer),
        username = %auth_user.username,
        "user logged out"
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Logout successful"
        })),
    ))
}
