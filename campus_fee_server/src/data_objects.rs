use campus_fee_engine::{
    cfe_api::payment_objects::PaymentStats,
    db_types::PaymentRecord,
};
use serde::{Deserialize, Serialize};

/// The order-creation body as it arrives off the wire. `fee_type` stays a plain string here on purpose: the
/// handler maps it onto the closed [`campus_fee_engine::db_types::FeeType`] enum and rejects anything
/// unrecognised before the core sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub fee_type: String,
    pub amount: i64,
}

/// The gateway callback relay. Absent fields deserialize to their defaults and are reported as missing by the
/// verification engine (or here, for the record id), so a half-assembled client gets a precise 400 rather than
/// an opaque deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default)]
    pub gateway_order_id: String,
    #[serde(default)]
    pub gateway_payment_id: String,
    #[serde(default)]
    pub gateway_signature: String,
    #[serde(default)]
    pub record_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentHistoryResponse {
    pub payments: Vec<PaymentRecord>,
    pub stats: Vec<PaymentStats>,
    pub count: usize,
}

/// Optional filters for the staff-facing listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentListQuery {
    pub status: Option<String>,
    pub fee_type: Option<String>,
    pub student_id: Option<String>,
}
