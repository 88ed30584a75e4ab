// SPDX-License-Identifier: Apache-2.0

use crate::http::pages::error_page;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use brewmap_store::{StoreError, StoreErrorCode};
use std::fmt;
use tracing::error;

/// Terminal request failures. Recoverable form problems never reach this type;
/// handlers re-render the form instead.
#[derive(Debug)]
pub(crate) enum AppError {
    NotFound(String),
    MethodNotAllowed(&'static str),
    InvalidForm(String),
    Store(StoreError),
}

impl AppError {
    #[must_use]
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidForm(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(err) => store_error_status(err.code),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) | Self::InvalidForm(msg) => f.write_str(msg),
            Self::MethodNotAllowed(msg) => f.write_str(msg),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        if err.is_not_found() {
            Self::NotFound(err.message)
        } else {
            Self::Store(err)
        }
    }
}

#[must_use]
pub(crate) fn store_error_status(code: StoreErrorCode) -> StatusCode {
    match code {
        StoreErrorCode::NotFound => StatusCode::NOT_FOUND,
        StoreErrorCode::Conflict => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Storage internals stay in the log.
            Self::Store(err) => {
                error!(code = err.code.as_str(), error = %err, "store operation failed");
                "The server could not complete the request.".to_string()
            }
            other => other.to_string(),
        };
        (status, Html(error_page(status, &message))).into_response()
    }
}
