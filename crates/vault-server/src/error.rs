//! HTTP error responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};
use vault_core::{AuthError, VaultError};

/// Error returned by a handler, rendered as `{ success: false, message }`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Missing or unusable `Authorization` header
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<VaultError> for ApiError {
    fn from(err: VaultError) -> Self {
        let status = match &err {
            VaultError::Validation(_) => StatusCode::BAD_REQUEST,
            VaultError::UserNotFound(_) => StatusCode::NOT_FOUND,
            VaultError::EmailTaken => StatusCode::CONFLICT,
            VaultError::InvalidCredentials | VaultError::Auth(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if err.is_client_error() {
            debug!("Request rejected: {}", err);
        } else {
            error!("Request failed: {}", err);
        }

        Self::new(status, err.public_message())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        VaultError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Malformed request body: {}", rejection.body_text());
        Self::new(StatusCode::BAD_REQUEST, "Invalid request body")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (VaultError::Validation("bad".to_string()), StatusCode::BAD_REQUEST),
            (VaultError::UserNotFound("u1".to_string()), StatusCode::NOT_FOUND),
            (VaultError::EmailTaken, StatusCode::CONFLICT),
            (VaultError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (VaultError::Auth(AuthError::Expired), StatusCode::UNAUTHORIZED),
            (VaultError::CryptoError("tag mismatch".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
            (VaultError::StorageError("locked".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_server_faults_are_generic() {
        let err = ApiError::from(VaultError::StorageError("no such column: public_key".to_string()));
        assert_eq!(err.message(), "Internal server error");

        let err = ApiError::from(VaultError::UserNotFound("u1".to_string()));
        assert_eq!(err.message(), "User not found");
    }
}
