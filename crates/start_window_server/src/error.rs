//! Error type for the render service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use start_window::WindowError;
use start_window::assets::admin_notice;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Window(#[from] WindowError),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Window(WindowError::EnvironmentUnsupported { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ServerError::Window(_) | ServerError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ServerError::Window(e) => admin_notice(e).unwrap_or_else(|| e.to_string()),
            ServerError::Validation(_) => self.to_string(),
        };
        tracing::debug!(%status, error = %self, "request failed");
        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_errors_are_unavailable() {
        let err = ServerError::from(WindowError::EnvironmentUnsupported {
            required: "5.3".into(),
            found: "5.2".into(),
        });
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn other_errors_are_bad_requests() {
        let err = ServerError::from(WindowError::InvalidTimezone("x".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServerError::Validation("no".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
