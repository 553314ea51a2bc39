//! Adapter between the engine's [`OrderGateway`] seam and the Razorpay REST client.

use campus_fee_engine::{
    db_types::OrderId,
    traits::{GatewayError, GatewayOrderRequest, GatewayOrderResponse, OrderGateway},
};
use log::trace;
use razorpay_tools::{NewGatewayOrder, OrderNotes, RazorpayApi, RazorpayApiError, RazorpayConfig};

#[derive(Clone)]
pub struct RazorpayGateway {
    api: RazorpayApi,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        let api = RazorpayApi::new(config)?;
        Ok(Self { api })
    }
}

impl OrderGateway for RazorpayGateway {
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrderResponse, GatewayError> {
        trace!("Relaying order creation to Razorpay for receipt {}", request.receipt);
        let order = NewGatewayOrder {
            amount: request.amount,
            currency: request.currency,
            receipt: request.receipt,
            notes: OrderNotes { student_id: request.student_id, fee_type: request.fee_type.to_string() },
        };
        let created = self.api.create_order(order).await.map_err(|e| match e {
            RazorpayApiError::Rejected { status, message } => GatewayError::Rejected { status, message },
            other => GatewayError::Unavailable(other.to_string()),
        })?;
        Ok(GatewayOrderResponse {
            order_id: OrderId::from(created.id),
            amount: created.amount,
            currency: created.currency,
        })
    }
}
