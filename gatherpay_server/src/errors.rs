use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use gatherpay_engine::FundingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("{0}")]
    Funding(#[from] FundingError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::Funding(e) => match e {
                FundingError::EventNotFound(_) => StatusCode::NOT_FOUND,
                FundingError::SignatureInvalid(_) => StatusCode::BAD_REQUEST,
                FundingError::AmountMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                FundingError::GatewayUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                FundingError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
                FundingError::PaymentAlreadyClaimed(_) => StatusCode::CONFLICT,
                FundingError::InvalidEvent(_) => StatusCode::BAD_REQUEST,
                FundingError::InvalidSchedule(_) => StatusCode::INTERNAL_SERVER_ERROR,
                FundingError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Storage details stay in the logs
        let message = match self {
            Self::Funding(FundingError::DatabaseError(_)) => {
                "An internal error occurred. Please try again later.".to_string()
            },
            _ => self.to_string(),
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": message }).to_string())
    }
}
