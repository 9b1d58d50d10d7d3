// ============================================================================
// Nimbus API - Auth Handlers
// File: crates/nimbus-api/src/handlers/auth.rs
// ============================================================================
//! Authentication HTTP handlers (register, login, logout, me)

use axum::{
    extract::State,
    http::HeaderMap,
    response::Response,
    Form, Json,
};
use nimbus_core::{PublicProfile, RegisterInput};
use serde::Deserialize;

use crate::cookies::{redirect_with_cookie, session_token};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Register handler - POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Form(input): Form<RegisterInput>,
) -> Result<Response, ApiError> {
    let outcome = state.auth.register(input).await?;
    Ok(redirect_with_cookie(outcome.redirect_to, &outcome.cookie))
}

/// Login handler - POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let outcome = state.auth.login(&form.email, &form.password).await?;
    Ok(redirect_with_cookie(outcome.redirect_to, &outcome.cookie))
}

/// Logout handler - POST /api/v1/auth/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = session_token(&headers, state.cookie_name());
    let outcome = state.auth.logout(token.as_deref());
    redirect_with_cookie(outcome.redirect_to, &outcome.cookie)
}

/// Current user - GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<PublicProfile>>, ApiError> {
    let token = session_token(&headers, state.cookie_name());
    let profile = state
        .auth
        .identify(token.as_deref())
        .await
        .ok_or_else(|| ApiError::Unauthorized("Not signed in".to_string()))?;
    Ok(Json(ApiResponse::success(profile)))
}
