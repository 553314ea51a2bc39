use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use crate::traits::{GatewayError, GatewayOrderRequest, GatewayOrderResponse, OrderGateway};

/// An in-process gateway for tests. Issues sequential order ids and can be flipped into an "unreachable" mode
/// to exercise the no-dangling-record guarantee.
#[derive(Clone, Default)]
pub struct TestGateway {
    counter: Arc<AtomicU64>,
    offline: Arc<AtomicBool>,
}

impl TestGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// How many orders have been created so far.
    pub fn orders_created(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl OrderGateway for TestGateway {
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrderResponse, GatewayError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("test gateway is offline".to_string()));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GatewayOrderResponse {
            order_id: format!("order_test{n:08}").parse().unwrap(),
            amount: request.amount,
            currency: request.currency,
        })
    }
}
