use cfs_common::Rupees;
use thiserror::Error;

use crate::{
    db_types::{FeeType, OrderId},
    traits::{GatewayError, PaymentStoreError},
};

/// Everything that can go wrong in the order and verification lifecycle. Every variant is distinguishable by
/// the caller, so clients can show an actionable message rather than a generic failure string.
///
/// Retryability: `GatewayUnavailable` and `StorageFailure` leave no partial state behind and may be retried
/// freely. Validation failures and `SignatureMismatch` are terminal for the request.
#[derive(Debug, Clone, Error)]
pub enum PaymentFlowError {
    #[error("Invalid fee type: {0}")]
    InvalidFeeType(String),
    #[error("Amount must be at least 1, got {0}")]
    InvalidAmount(i64),
    #[error("The {fee_type} fee is already settled in full ({paid} of {ceiling} paid)")]
    FeeAlreadySettled { fee_type: FeeType, paid: Rupees, ceiling: Rupees },
    #[error("The payment gateway could not be reached: {0}")]
    GatewayUnavailable(String),
    #[error("The payment gateway rejected the order. Error {status}. {message}")]
    GatewayRejected { status: u16, message: String },
    #[error("Missing payment verification data: {0}")]
    MissingFields(&'static str),
    #[error("Payment record {0} not found")]
    RecordNotFound(i64),
    #[error("Not authorized to verify this payment")]
    NotAuthorized,
    #[error("Payment verification failed - invalid signature")]
    SignatureMismatch,
    #[error("An order already exists with id {0}")]
    DuplicateOrderId(OrderId),
    #[error("A storage error occurred: {0}")]
    StorageFailure(String),
}

impl From<PaymentStoreError> for PaymentFlowError {
    fn from(e: PaymentStoreError) -> Self {
        match e {
            PaymentStoreError::DatabaseError(e) => PaymentFlowError::StorageFailure(e),
            PaymentStoreError::DuplicateOrderId(id) => PaymentFlowError::DuplicateOrderId(id),
            PaymentStoreError::FeeAlreadySettled { fee_type, paid, ceiling } => {
                PaymentFlowError::FeeAlreadySettled { fee_type, paid, ceiling }
            },
        }
    }
}

impl From<GatewayError> for PaymentFlowError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Unavailable(msg) => PaymentFlowError::GatewayUnavailable(msg),
            GatewayError::Rejected { status, message } => PaymentFlowError::GatewayRejected { status, message },
        }
    }
}
