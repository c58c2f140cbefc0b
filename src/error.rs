use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use serde::Serialize;

use crate::auth::StoreError;

/// Every failure the session layer can hand back to a caller. All variants
/// are recoverable by the caller; none aborts the process.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing username or password.")]
    InvalidInput,
    // Unknown user and wrong password share this message on purpose, so the
    // response cannot be used to enumerate usernames.
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error("AUTH_REQUIRED")]
    AuthRequired,
    #[error("{0}")]
    Store(#[from] StoreError),
}

#[derive(Serialize)]
struct ErrorJson {
    success: bool,
    error: String,
    #[serde(rename = "authRequired", skip_serializing_if = "Option::is_none")]
    auth_required: Option<bool>,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        warn!("{}", self);

        let status = self.status_code();
        let auth_required = matches!(self, AuthError::AuthRequired).then_some(true);
        (
            status,
            Json(ErrorJson {
                success: false,
                error: self.to_string(),
                auth_required,
            }),
        )
            .into_response()
    }
}

impl AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidInput => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials | AuthError::AuthRequired => StatusCode::UNAUTHORIZED,
            AuthError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
