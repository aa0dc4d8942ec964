use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{LoginRequest, RegisterRequest, validate_login, validate_registration};
use super::{ApiError, AppState, TokenResponse};

/// POST /users
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let Json(request) = payload?;
    let (email, name, password) = validate_registration(&request)?;

    let token = state.accounts().register(&email, &name, &password).await?;

    Ok((StatusCode::CREATED, Json(TokenResponse::new(token))))
}

/// POST /sessions
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = payload?;
    let (email, password) = validate_login(&request)?;

    let token = state.accounts().login(&email, &password).await?;

    Ok(Json(TokenResponse::new(token)))
}
