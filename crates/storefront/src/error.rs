//! Error responses for storefront handlers.
//!
//! Handlers return [`Result<T>`]. Server errors are reported to Sentry
//! before the response is written; only catalog failures show their text
//! to the visitor.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Storefront handler error.
#[derive(Debug, Error)]
pub enum AppError {
    /// The catalog could not serve the request; carries visitor-facing text.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the visitor session failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The shop answered with an outcome the handler cannot render.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unavailable(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Request error"
        );

        let message = match self {
            Self::Unavailable(text) => text,
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
