//! Provider credential endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use vault_core::{CredentialStatus, CredentialUpdate, VaultServices};

use crate::error::ApiError;
use crate::extract::AuthUser;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    success: bool,
    #[serde(flatten)]
    status: CredentialStatus,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    success: bool,
    message: &'static str,
}

/// GET /api/credentials
pub async fn status(
    State(services): State<Arc<VaultServices>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<StatusResponse>, ApiError> {
    let status = services.credentials.get_status(&claims.user_id).await?;
    Ok(Json(StatusResponse {
        success: true,
        status,
    }))
}

/// PUT /api/credentials
pub async fn update(
    State(services): State<Arc<VaultServices>>,
    AuthUser(claims): AuthUser,
    payload: Result<Json<CredentialUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(update) = payload?;
    services
        .credentials
        .set_credentials(&claims.user_id, &update)
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Credentials updated successfully",
    }))
}

/// DELETE /api/credentials
pub async fn remove(
    State(services): State<Arc<VaultServices>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    services.credentials.clear_credentials(&claims.user_id).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Credentials removed successfully",
    }))
}
