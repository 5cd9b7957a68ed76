// src/server/error.rs

//! Normalization of pipeline failures into one HTTP error shape.
//!
//! ```json
//! {"error": {"kind": "execution_failure", "message": "...", "causes": ["..."]}}
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::errors::BridgeError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub message: String,
    /// `source()` chain of the error, outermost first.
    pub causes: Vec<String>,
}

/// Wrapper that lets handlers return `BridgeError` with `?`.
#[derive(Debug)]
pub struct ApiError(pub BridgeError);

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BridgeError::Validation(_) => StatusCode::BAD_REQUEST,
            BridgeError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            BridgeError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            BridgeError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let mut causes = Vec::new();
        let mut source = std::error::Error::source(&self.0);
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        ErrorBody {
            error: ErrorDetail {
                kind: self.0.kind().to_string(),
                message: self.0.to_string(),
                causes,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = self.0.kind(), error = %self.0, "schedule request failed");
        } else {
            warn!(kind = self.0.kind(), error = %self.0, "schedule request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
