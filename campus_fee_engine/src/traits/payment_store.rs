use cfs_common::Rupees;
use thiserror::Error;

use crate::db_types::{FeeType, NewPaymentRecord, OrderId, PaymentRecord, PaymentStatus, VerificationOutcome};

/// The persistence interface consumed by the payment flow. All mutation of payment state goes through
/// [`PaymentStore::insert_payment_record`] and [`PaymentStore::finalize_payment_record`]; everything else is a
/// strict-consistency read.
#[allow(async_fn_in_trait)]
pub trait PaymentStore {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Stores a new `Pending` payment record in a single atomic transaction.
    ///
    /// The transaction re-evaluates the settled guard (completed total vs. the fee catalog ceiling) so that
    /// two concurrent creations cannot both pass a check that one of them should fail, and relies on the
    /// storage-level UNIQUE constraint on `order_id` to refuse duplicate gateway orders under retries.
    async fn insert_payment_record(&self, record: NewPaymentRecord) -> Result<PaymentRecord, PaymentStoreError>;

    async fn fetch_payment_record(&self, id: i64) -> Result<Option<PaymentRecord>, PaymentStoreError>;

    async fn fetch_record_by_order_id(&self, order_id: &OrderId) -> Result<Option<PaymentRecord>, PaymentStoreError>;

    /// Applies the one permitted transition away from `Pending` as a compare-and-set.
    ///
    /// Returns the updated record, or `None` when the record was no longer `Pending` — i.e. a concurrent
    /// verification won the transition, or the outcome was already applied. The caller decides what the loser
    /// observes; the store never applies a second transition.
    async fn finalize_payment_record(
        &self,
        id: i64,
        outcome: VerificationOutcome,
    ) -> Result<Option<PaymentRecord>, PaymentStoreError>;

    /// The completed total for one (student, fee type) pair. A derived read used as the ledger guard; the
    /// records themselves remain the source of truth.
    async fn sum_completed(&self, student_id: &str, fee_type: FeeType) -> Result<Rupees, PaymentStoreError>;

    /// All records for a student, newest first.
    async fn fetch_records_for_student(&self, student_id: &str) -> Result<Vec<PaymentRecord>, PaymentStoreError>;

    /// Fetches payment records according to the criteria in the filter, newest first.
    async fn search_payment_records(&self, query: PaymentQueryFilter) -> Result<Vec<PaymentRecord>, PaymentStoreError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), PaymentStoreError> {
        Ok(())
    }
}

//--------------------------------------  PaymentQueryFilter  --------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct PaymentQueryFilter {
    pub student_id: Option<String>,
    pub fee_type: Option<FeeType>,
    pub status: Option<PaymentStatus>,
}

impl PaymentQueryFilter {
    pub fn is_empty(&self) -> bool {
        self.student_id.is_none() && self.fee_type.is_none() && self.status.is_none()
    }

    pub fn with_student_id<S: Into<String>>(mut self, student_id: S) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    pub fn with_fee_type(mut self, fee_type: FeeType) -> Self {
        self.fee_type = Some(fee_type);
        self
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = Some(status);
        self
    }
}

//--------------------------------------  PaymentStoreError  ---------------------------------------------------------
#[derive(Debug, Clone, Error)]
pub enum PaymentStoreError {
    #[error("There is an internal database engine error: {0}")]
    DatabaseError(String),
    #[error("Cannot insert payment record, an order already exists with id {0}")]
    DuplicateOrderId(OrderId),
    #[error("The {fee_type} fee is already settled: {paid} of {ceiling} paid")]
    FeeAlreadySettled { fee_type: FeeType, paid: Rupees, ceiling: Rupees },
}

impl From<sqlx::Error> for PaymentStoreError {
    fn from(e: sqlx::Error) -> Self {
        PaymentStoreError::DatabaseError(e.to_string())
    }
}
