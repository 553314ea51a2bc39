use thiserror::Error;

#[derive(Debug, Error)]
pub enum RazorpayApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("The gateway could not be reached: {0}")]
    Unavailable(String),
    #[error("The gateway rejected the order. Error {status}. {message}")]
    Rejected { status: u16, message: String },
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
}

impl RazorpayApiError {
    /// Transport-level failures may be retried by the caller; a rejection is final for the given request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RazorpayApiError::Unavailable(_))
    }
}
