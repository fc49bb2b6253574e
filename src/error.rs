use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Field name -> human readable message.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request.")]
    Validation(FieldErrors),

    #[error("Login failed")]
    InvalidCredentials,

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Error envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), message.into());
        Self::Validation(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::AuthenticationRequired => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(self) -> ErrorBody {
        match self {
            AppError::Validation(errors) => ErrorBody {
                title: Some("Bad request.".into()),
                message: Some("Bad request.".into()),
                errors: Some(errors),
            },
            AppError::InvalidCredentials => ErrorBody {
                title: Some("Login failed".into()),
                message: None,
                errors: Some(FieldErrors::from([(
                    "credential".to_string(),
                    "The provided credentials were invalid.".to_string(),
                )])),
            },
            AppError::AuthenticationRequired => ErrorBody {
                title: Some("Authentication required".into()),
                message: Some("Authentication required".into()),
                errors: Some(FieldErrors::from([(
                    "message".to_string(),
                    "Authentication required".to_string(),
                )])),
            },
            AppError::Forbidden => ErrorBody {
                title: None,
                message: Some("Forbidden".into()),
                errors: None,
            },
            AppError::NotFound(message) => ErrorBody {
                title: None,
                message: Some(message),
                errors: None,
            },
            AppError::Internal(e) => {
                error!(error = %format!("{e:#}"), "internal error");
                ErrorBody {
                    title: Some("Server Error".into()),
                    message: Some("Internal server error".into()),
                    errors: None,
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.body())).into_response()
    }
}
