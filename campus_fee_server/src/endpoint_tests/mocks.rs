use campus_fee_engine::{
    db_types::{FeeType, NewPaymentRecord, OrderId, PaymentRecord, VerificationOutcome},
    traits::{
        GatewayError,
        GatewayOrderRequest,
        GatewayOrderResponse,
        OrderGateway,
        PaymentQueryFilter,
        PaymentStore,
        PaymentStoreError,
    },
};
use cfs_common::Rupees;
use mockall::mock;

mock! {
    pub PaymentStoreBackend {}
    impl PaymentStore for PaymentStoreBackend {
        fn url(&self) -> &str;
        async fn insert_payment_record(&self, record: NewPaymentRecord) -> Result<PaymentRecord, PaymentStoreError>;
        async fn fetch_payment_record(&self, id: i64) -> Result<Option<PaymentRecord>, PaymentStoreError>;
        async fn fetch_record_by_order_id(&self, order_id: &OrderId) -> Result<Option<PaymentRecord>, PaymentStoreError>;
        async fn finalize_payment_record(&self, id: i64, outcome: VerificationOutcome) -> Result<Option<PaymentRecord>, PaymentStoreError>;
        async fn sum_completed(&self, student_id: &str, fee_type: FeeType) -> Result<Rupees, PaymentStoreError>;
        async fn fetch_records_for_student(&self, student_id: &str) -> Result<Vec<PaymentRecord>, PaymentStoreError>;
        async fn search_payment_records(&self, query: PaymentQueryFilter) -> Result<Vec<PaymentRecord>, PaymentStoreError>;
        async fn close(&mut self) -> Result<(), PaymentStoreError>;
    }
}

mock! {
    pub Gateway {}
    impl OrderGateway for Gateway {
        async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrderResponse, GatewayError>;
    }
}
