//! Unified error handling for the metafields service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::BulkRunError;

/// Application-level error type for the HTTP service.
#[derive(Debug, Error)]
pub enum AppError {
    /// A bulk run failed at some stage.
    #[error(transparent)]
    Bulk(#[from] BulkRunError),

    /// Shopify accepted the request but created no bulk operation.
    #[error("Bulk operation not created: {0}")]
    BulkNotCreated(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Bulk(_) | Self::BulkNotCreated(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, "Rejected request");
        }

        (status, format!("Error: {self}")).into_response()
    }
}
