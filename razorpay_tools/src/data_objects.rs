use serde::{Deserialize, Serialize};

/// Identifying metadata attached to a gateway order. Razorpay echoes these back in dashboards and webhooks, so
/// staff can trace an order without holding our database open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderNotes {
    pub student_id: String,
    pub fee_type: String,
}

/// The request body for `POST /v1/orders`. `amount` is in minor units (paise).
#[derive(Debug, Clone, Serialize)]
pub struct NewGatewayOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: OrderNotes,
}

/// The subset of the gateway's order entity that we consume.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
