use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tenderlens::{AnalysisError, StoreError};
use tenderlens_pdf::ExtractionError;
use tracing::error;

/// A custom error type for the server application.
///
/// Each variant is one failure class of a request; `into_response` turns it
/// into a status code and an `{"error": ...}` body.
#[derive(Debug)]
pub enum AppError {
    /// The request itself is unacceptable (wrong file type, no text, missing field).
    Validation(String),
    Extraction(ExtractionError),
    Analysis(AnalysisError),
    Store(StoreError),
    /// A bounded call to a remote provider did not finish in time.
    Timeout(&'static str),
    NotImplemented,
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::Extraction(err)
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::Analysis(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

/// A request body that is not valid JSON for the endpoint.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Conversion from `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Extraction(ExtractionError::Parse(_)) => StatusCode::BAD_REQUEST,
            AppError::Extraction(ExtractionError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Analysis(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_message = match self {
            AppError::Validation(msg) => msg,
            AppError::Extraction(err) => {
                error!("ExtractionError: {:?}", err);
                format!("Error processing PDF: {err}")
            }
            AppError::Analysis(err) => {
                error!("AnalysisError: {:?}", err);
                err.to_string()
            }
            AppError::Store(err) => {
                error!("StoreError: {:?}", err);
                format!("Error storing or searching tenders: {err}")
            }
            AppError::Timeout(operation) => {
                error!("Timed out during {operation}");
                format!("Upstream service timed out during {operation}.")
            }
            AppError::NotImplemented => "Endpoint not yet implemented".to_string(),
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                "An internal server error occurred.".to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
