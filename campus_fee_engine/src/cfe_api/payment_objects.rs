use cfs_common::Rupees;
use serde::{Deserialize, Serialize};

use crate::db_types::{FeeType, OrderId, PaymentStatus};

//--------------------------------------     OrderHandle      --------------------------------------------------------
/// What the order issuer hands back to the client: everything the checkout widget needs, and nothing that could
/// be used to forge a verification later. `amount` is in paise, as the gateway quotes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHandle {
    pub order_id: OrderId,
    pub amount: i64,
    pub currency: String,
    pub record_id: i64,
    pub fee_type: FeeType,
}

//--------------------------------------    VerifyRequest     --------------------------------------------------------
/// The gateway's callback payload, as relayed by the client. All four fields are required; the strings are
/// checked for emptiness by the verification engine so that loosely assembled clients fail loudly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub gateway_signature: String,
    pub record_id: i64,
}

//-------------------------------------- PaymentConfirmation  --------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub record_id: i64,
    pub status: PaymentStatus,
    pub fee_type: FeeType,
    pub amount: Rupees,
    pub transaction_id: Option<String>,
}

impl From<&crate::db_types::PaymentRecord> for PaymentConfirmation {
    fn from(record: &crate::db_types::PaymentRecord) -> Self {
        Self {
            record_id: record.id,
            status: record.status,
            fee_type: record.fee_type,
            amount: record.amount,
            transaction_id: record.gateway_payment_id.clone(),
        }
    }
}

//--------------------------------------     PaymentStats     --------------------------------------------------------
/// Per-fee-type completed totals for one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStats {
    pub fee_type: FeeType,
    pub total_paid: Rupees,
    pub payment_count: i64,
}
