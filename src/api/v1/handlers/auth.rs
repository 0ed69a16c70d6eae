/*
 * Responsibility
 * - /auth/login, /auth/refresh handler（gate 除外の発行系）
 * - subject はここでは検証済み前提（パスワードは扱わない）
 * - roles は users.role の現在値から。refresh でも引き直す
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::dto::auth::{AuthResponse, LoginRequest, RefreshRequest},
    error::AppError,
    services::auth::Identity,
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_LOGIN", msg))?;

    let identity = state
        .identities
        .find_by_subject(&req.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    issue_pair(&state, &identity).map(Json)
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    // Refresh tokens carry only the subject; a failure of any kind is the same
    // 401 the access gate produces.
    let claims = state.tokens.verify(&req.refresh_token).map_err(|err| {
        tracing::warn!(error = %err, "refresh token verification failed");
        AppError::Unauthorized
    })?;

    let identity = state
        .identities
        .find_by_subject(&claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)?;

    issue_pair(&state, &identity).map(Json)
}

fn issue_pair(state: &AppState, identity: &Identity) -> Result<AuthResponse, AppError> {
    let access_token = state
        .tokens
        .issue_access_token(&identity.subject, &identity.roles)?;
    let refresh_token = state.tokens.issue_refresh_token(&identity.subject)?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
    })
}
