use crate::db_types::PaymentRecord;

/// Emitted exactly once per record, when the verification engine transitions it to `Completed`. Losers of a
/// concurrent verification race observe the terminal record but do not emit.
#[derive(Debug, Clone)]
pub struct PaymentCompletedEvent {
    pub payment: PaymentRecord,
}
