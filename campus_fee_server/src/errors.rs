use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use campus_fee_engine::PaymentFlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("Too many requests. Slow down and try again later.")]
    TooManyRequests,
    #[error("{0}")]
    PaymentFlow(#[from] PaymentFlowError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedToken(_) => StatusCode::BAD_REQUEST,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            // Every payment failure is distinguishable by kind, so clients can show an actionable message.
            Self::PaymentFlow(e) => match e {
                PaymentFlowError::InvalidFeeType(_) => StatusCode::BAD_REQUEST,
                PaymentFlowError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
                PaymentFlowError::MissingFields(_) => StatusCode::BAD_REQUEST,
                PaymentFlowError::SignatureMismatch => StatusCode::BAD_REQUEST,
                PaymentFlowError::FeeAlreadySettled { .. } => StatusCode::CONFLICT,
                PaymentFlowError::DuplicateOrderId(_) => StatusCode::CONFLICT,
                PaymentFlowError::NotAuthorized => StatusCode::FORBIDDEN,
                PaymentFlowError::RecordNotFound(_) => StatusCode::NOT_FOUND,
                PaymentFlowError::GatewayUnavailable(_) => StatusCode::BAD_GATEWAY,
                PaymentFlowError::GatewayRejected { .. } => StatusCode::BAD_GATEWAY,
                PaymentFlowError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No access token was provided.")]
    MissingToken,
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
}
