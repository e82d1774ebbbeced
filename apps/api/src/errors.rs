use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::mail::MailError;
use crate::relay::handlers::RelayResponse;
use crate::upload::UploadError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Clients only ever see the fixed message; details go to the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Resume file missing")]
    MissingResume,

    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid submitter email: {0}")]
    InvalidEmail(#[source] MailError),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Application email failed: {0}")]
    ApplicationSend(#[source] MailError),

    #[error("Contact email failed: {0}")]
    ContactSend(#[source] MailError),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::MissingResume => (StatusCode::BAD_REQUEST, "Resume file missing"),
            AppError::MissingFields => (StatusCode::BAD_REQUEST, "Missing required fields"),
            AppError::InvalidEmail(_) => (StatusCode::BAD_REQUEST, "Invalid email address"),
            AppError::InvalidBody(_) => (StatusCode::BAD_REQUEST, "Invalid request body"),
            AppError::Upload(UploadError::TooLarge { .. }) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Resume file exceeds the 2MB limit",
            ),
            AppError::Upload(UploadError::Malformed(_)) => {
                (StatusCode::BAD_REQUEST, "Malformed upload")
            }
            AppError::Upload(UploadError::UnexpectedFile(_)) => {
                (StatusCode::BAD_REQUEST, "Unexpected file field")
            }
            AppError::Upload(UploadError::Io(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store upload")
            }
            AppError::ApplicationSend(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to send email")
            }
            AppError::ContactSend(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to send contact email")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!("{self:?}");
        } else {
            tracing::warn!("Rejected submission: {self}");
        }

        (status, Json(RelayResponse::failure(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_send_failure_hides_transport_detail() {
        let (status, body) =
            body_of(AppError::ContactSend(MailError::Smtp("535 bad credentials".into()))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to send contact email");
        assert!(!body.to_string().contains("535"));
    }

    #[tokio::test]
    async fn test_oversized_upload_maps_to_413() {
        let (status, body) = body_of(AppError::Upload(UploadError::TooLarge {
            limit: crate::upload::MAX_UPLOAD_BYTES,
        }))
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["message"], "Resume file exceeds the 2MB limit");
    }

    #[tokio::test]
    async fn test_storage_failure_is_500() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let (status, body) = body_of(AppError::Upload(UploadError::Io(io))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to store upload");
    }
}
