use std::fmt::Debug;

use cfs_common::{Rupees, Secret, FEE_CURRENCY_CODE};
use chrono::Utc;
use log::*;

use crate::{
    cfe_api::{
        errors::PaymentFlowError,
        payment_objects::{OrderHandle, PaymentStats, VerifyRequest},
    },
    db_types::{FeeType, NewPaymentRecord, PaymentRecord, VerificationOutcome},
    events::{EventProducers, PaymentCompletedEvent},
    fee_catalog,
    helpers::verify_callback,
    traits::{GatewayOrderRequest, OrderGateway, PaymentQueryFilter, PaymentStore},
};

/// `PaymentFlowApi` is the primary API for the fee payment lifecycle: issuing gateway orders against the fee
/// catalog, and verifying the gateway's signed payment callbacks.
pub struct PaymentFlowApi<B, G> {
    db: B,
    gateway: G,
    callback_secret: Secret<String>,
    producers: EventProducers,
}

impl<B, G> Debug for PaymentFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentFlowApi")
    }
}

impl<B, G> PaymentFlowApi<B, G> {
    pub fn new(db: B, gateway: G, callback_secret: Secret<String>, producers: EventProducers) -> Self {
        Self { db, gateway, callback_secret, producers }
    }
}

impl<B, G> PaymentFlowApi<B, G>
where
    B: PaymentStore,
    G: OrderGateway,
{
    /// Create a gateway order for a fee payment and store the matching `Pending` record.
    ///
    /// The requested amount may be a partial payment toward the fee-type ceiling. The settled guard runs
    /// before anything is created: once the completed total has reached the catalog ceiling, no further orders
    /// are issued for that (student, fee type) pair.
    ///
    /// The gateway call happens *before* the record is inserted. A gateway timeout or rejection therefore
    /// leaves no dangling record behind, and the caller may simply retry.
    ///
    /// Note that the requested amount is not clamped to `ceiling - already_paid`. A student with ₹49,000 of a
    /// ₹50,000 fee settled can still open a ₹49,000 order, and completing it pushes the ledger past the
    /// ceiling. The guard only refuses orders once the ceiling has been *reached*. See the ledger tests, which
    /// pin this behavior down.
    pub async fn create_order(
        &self,
        student_id: &str,
        fee_type: FeeType,
        amount: Rupees,
    ) -> Result<OrderHandle, PaymentFlowError> {
        if amount.value() < 1 {
            return Err(PaymentFlowError::InvalidAmount(amount.value()));
        }
        let ceiling = fee_catalog::ceiling_for(fee_type);
        let already_paid = self.db.sum_completed(student_id, fee_type).await?;
        if already_paid >= ceiling {
            debug!("🧾️ {student_id} has already settled the {fee_type} fee ({already_paid} of {ceiling})");
            return Err(PaymentFlowError::FeeAlreadySettled { fee_type, paid: already_paid, ceiling });
        }
        let receipt = format!("receipt_{}_{student_id}", Utc::now().timestamp_millis());
        let request = GatewayOrderRequest {
            amount: amount.to_paise(),
            currency: FEE_CURRENCY_CODE.to_string(),
            receipt,
            student_id: student_id.to_string(),
            fee_type,
        };
        let gateway_order = self.gateway.create_order(request).await?;
        trace!("🧾️ Gateway order {} created for {student_id}", gateway_order.order_id);
        let record = self
            .db
            .insert_payment_record(NewPaymentRecord::new(student_id, fee_type, amount, gateway_order.order_id.clone()))
            .await?;
        debug!("🧾️ Order {} recorded as payment record #{} ({} {fee_type})", record.order_id, record.id, amount);
        Ok(OrderHandle {
            order_id: gateway_order.order_id,
            amount: gateway_order.amount,
            currency: gateway_order.currency,
            record_id: record.id,
            fee_type,
        })
    }

    /// Verify the gateway's signed callback for a pending order and finalize the record.
    ///
    /// Exactly one of three things happens:
    /// * the signature checks out — the record transitions to `Completed` and is returned;
    /// * the signature does not check out — the record transitions to `Failed` (kept for the audit trail) and
    ///   `SignatureMismatch` is returned;
    /// * the record is already terminal — it is returned as-is. Re-submitting an identical callback is
    ///   harmless: no second transition is applied, no second completion event is emitted, and the ledger is
    ///   not double-counted.
    ///
    /// Verification is self-service only: a student cannot finalize another student's order.
    pub async fn verify_payment(
        &self,
        claim: &VerifyRequest,
        requesting_student: &str,
    ) -> Result<PaymentRecord, PaymentFlowError> {
        if claim.gateway_order_id.is_empty() {
            return Err(PaymentFlowError::MissingFields("gateway_order_id"));
        }
        if claim.gateway_payment_id.is_empty() {
            return Err(PaymentFlowError::MissingFields("gateway_payment_id"));
        }
        if claim.gateway_signature.is_empty() {
            return Err(PaymentFlowError::MissingFields("gateway_signature"));
        }
        let record = self
            .db
            .fetch_payment_record(claim.record_id)
            .await?
            .ok_or(PaymentFlowError::RecordNotFound(claim.record_id))?;
        if record.student_id != requesting_student {
            warn!(
                "🔏️ {requesting_student} attempted to verify payment record #{} belonging to {}",
                record.id, record.student_id
            );
            return Err(PaymentFlowError::NotAuthorized);
        }
        if record.status.is_terminal() {
            debug!("🔏️ Record #{} is already {}. Returning it unchanged.", record.id, record.status);
            return Ok(record);
        }
        let order_id = record.order_id.clone();
        let valid = verify_callback(
            self.callback_secret.reveal(),
            &order_id,
            &claim.gateway_payment_id,
            &claim.gateway_signature,
        );
        if valid {
            let outcome = VerificationOutcome::Completed {
                gateway_payment_id: claim.gateway_payment_id.clone(),
                gateway_signature: claim.gateway_signature.clone(),
            };
            match self.db.finalize_payment_record(record.id, outcome).await? {
                Some(completed) => {
                    info!("🔏️ Payment record #{} verified and completed for order {order_id}", completed.id);
                    self.call_payment_completed_hook(&completed).await;
                    Ok(completed)
                },
                // A concurrent verification won the transition. Re-read and hand back the terminal record.
                None => {
                    debug!("🔏️ Record #{} was finalized concurrently. Returning the terminal state.", record.id);
                    self.db
                        .fetch_payment_record(record.id)
                        .await?
                        .ok_or(PaymentFlowError::RecordNotFound(record.id))
                },
            }
        } else {
            let finalized = self.db.finalize_payment_record(record.id, VerificationOutcome::Failed).await?;
            match finalized {
                Some(failed) => {
                    warn!("🔏️ Signature mismatch for record #{} (order {order_id}). Marked as failed.", failed.id);
                    Err(PaymentFlowError::SignatureMismatch)
                },
                None => {
                    debug!("🔏️ Record #{} was finalized concurrently during a mismatched submission.", record.id);
                    self.db
                        .fetch_payment_record(record.id)
                        .await?
                        .ok_or(PaymentFlowError::RecordNotFound(record.id))
                },
            }
        }
    }

    async fn call_payment_completed_hook(&self, payment: &PaymentRecord) {
        for emitter in &self.producers.payment_completed_producer {
            trace!("🔏️📬️ Notifying payment completed hook subscribers");
            let event = PaymentCompletedEvent { payment: payment.clone() };
            emitter.publish_event(event).await;
        }
    }

    /// The completed total for one (student, fee type) pair. A derived read over the payment store, used by the
    /// order issuer as a guard and by reporting.
    pub async fn total_completed(&self, student_id: &str, fee_type: FeeType) -> Result<Rupees, PaymentFlowError> {
        let total = self.db.sum_completed(student_id, fee_type).await?;
        Ok(total)
    }

    /// A student's own payment history, newest first, with per-fee-type completed totals.
    pub async fn history_for_student(
        &self,
        student_id: &str,
    ) -> Result<(Vec<PaymentRecord>, Vec<PaymentStats>), PaymentFlowError> {
        let records = self.db.fetch_records_for_student(student_id).await?;
        let mut stats: Vec<PaymentStats> = Vec::new();
        for record in records.iter().filter(|r| r.status == crate::db_types::PaymentStatus::Completed) {
            match stats.iter_mut().find(|s| s.fee_type == record.fee_type) {
                Some(entry) => {
                    entry.total_paid += record.amount;
                    entry.payment_count += 1;
                },
                None => {
                    stats.push(PaymentStats { fee_type: record.fee_type, total_paid: record.amount, payment_count: 1 })
                },
            }
        }
        Ok((records, stats))
    }

    /// Staff-facing listing over all payment records.
    pub async fn search_payments(&self, query: PaymentQueryFilter) -> Result<Vec<PaymentRecord>, PaymentFlowError> {
        let records = self.db.search_payment_records(query).await?;
        Ok(records)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
