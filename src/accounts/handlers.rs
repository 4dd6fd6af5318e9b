use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{AuthResponse, LoginRequest, PublicAccount, RefreshRequest, RegisterRequest},
    extractors::AuthUser,
    jwt::JwtKeys,
    services,
};
use crate::{error::AppError, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, keys, payload))]
pub async fn register(
    State(state): State<AppState>,
    State(keys): State<JwtKeys>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    services::register(state.accounts.as_ref(), &keys, payload)
        .await
        .map(Json)
}

#[instrument(skip(state, keys, payload))]
pub async fn login(
    State(state): State<AppState>,
    State(keys): State<JwtKeys>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    services::login(state.accounts.as_ref(), &keys, payload)
        .await
        .map(Json)
}

#[instrument(skip(state, keys, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    State(keys): State<JwtKeys>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    services::refresh(state.accounts.as_ref(), &keys, payload)
        .await
        .map(Json)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
) -> Result<Json<PublicAccount>, AppError> {
    services::me(state.accounts.as_ref(), &email).await.map(Json)
}
