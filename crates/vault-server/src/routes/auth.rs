//! Registration, login and session introspection

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use vault_core::{AuthSession, LoginRequest, RegisterRequest, UserProfile, VaultServices};

use crate::error::ApiError;
use crate::extract::AuthUser;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    success: bool,
    token: String,
    user: UserProfile,
}

impl From<AuthSession> for SessionResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            success: true,
            token: session.token,
            user: session.user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    success: bool,
    user: UserProfile,
}

/// POST /api/auth/register
pub async fn register(
    State(services): State<Arc<VaultServices>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let Json(request) = payload?;
    let session = services.accounts.register(&request).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

/// POST /api/auth/login
pub async fn login(
    State(services): State<Arc<VaultServices>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(request) = payload?;
    let session = services.accounts.login(&request).await?;
    Ok(Json(session.into()))
}

/// GET /api/auth/me
pub async fn me(
    State(services): State<Arc<VaultServices>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = services.accounts.profile(&claims.user_id).await?;
    Ok(Json(ProfileResponse {
        success: true,
        user,
    }))
}
