//! Status check handler - POST /api/v1/status/check

use axum::{extract::State, http::HeaderMap, Form, Json};
use nimbus_security::DiagnosticReport;
use serde::Deserialize;

use crate::cookies::session_token;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusCheckForm {
    #[serde(default)]
    pub cmd: String,
}

/// Signed-in callers only; the command must pass the sandbox allow-list.
pub async fn check_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<StatusCheckForm>,
) -> Result<Json<ApiResponse<DiagnosticReport>>, ApiError> {
    let token = session_token(&headers, state.cookie_name());
    if state.auth.identify(token.as_deref()).await.is_none() {
        return Err(ApiError::Unauthorized("Not signed in".to_string()));
    }

    let report = state.diagnostics.run_command(&form.cmd).await?;
    Ok(Json(ApiResponse::success(report)))
}
