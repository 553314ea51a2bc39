use thiserror::Error;

use crate::db_types::{FeeType, OrderId};

/// The external order-creation collaborator. The engine only ever asks it to create orders; payment capture and
/// settlement happen on the gateway's side, out of band, and come back to us as a signed callback.
#[allow(async_fn_in_trait)]
pub trait OrderGateway {
    /// Ask the gateway to create an order for the given amount. Implementations must bound the call with a
    /// timeout and surface transport faults as [`GatewayError::Unavailable`] — the engine creates no local
    /// state until this call has succeeded, so callers may retry freely.
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrderResponse, GatewayError>;
}

#[derive(Debug, Clone)]
pub struct GatewayOrderRequest {
    /// Amount in minor units (paise).
    pub amount: i64,
    pub currency: String,
    /// A unique receipt token for reconciliation on the gateway dashboard.
    pub receipt: String,
    pub student_id: String,
    pub fee_type: FeeType,
}

#[derive(Debug, Clone)]
pub struct GatewayOrderResponse {
    pub order_id: OrderId,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("The payment gateway could not be reached: {0}")]
    Unavailable(String),
    #[error("The payment gateway rejected the order. Error {status}. {message}")]
    Rejected { status: u16, message: String },
}
