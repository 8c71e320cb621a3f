use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use pos_engine::{ErrorKind, OrderFlowError, ReportApiError};
use thiserror::Error;

const STORAGE_FAILURE_MESSAGE: &str = "The order store could not complete the request";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("Could not read query string: {0}")]
    InvalidQuery(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    PreconditionFailed(String),
    #[error("{0}")]
    Conflict(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Unauthenticated. {0}")]
    Unauthenticated(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::PreconditionFailed(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e.kind() {
            ErrorKind::Validation => Self::ValidationError(e.to_string()),
            ErrorKind::Unauthenticated => Self::Unauthenticated(e.to_string()),
            ErrorKind::NotFound => Self::NoRecordFound(e.to_string()),
            ErrorKind::Precondition => Self::PreconditionFailed(e.to_string()),
            ErrorKind::Conflict => Self::Conflict(e.to_string()),
            ErrorKind::Storage => {
                error!("💻️ {e}");
                Self::BackendError(STORAGE_FAILURE_MESSAGE.to_string())
            },
        }
    }
}

impl From<ReportApiError> for ServerError {
    fn from(e: ReportApiError) -> Self {
        match e {
            ReportApiError::QueryError(_) => Self::InvalidQuery(e.to_string()),
            ReportApiError::StorageFailure(_) => {
                error!("💻️ {e}");
                Self::BackendError(STORAGE_FAILURE_MESSAGE.to_string())
            },
        }
    }
}
