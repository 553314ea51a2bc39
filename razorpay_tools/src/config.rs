use log::*;
use cfs_common::Secret;

pub const DEFAULT_RAZORPAY_BASE_URL: &str = "https://api.razorpay.com";
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default)]
pub struct RazorpayConfig {
    /// The base url for the Razorpay REST API. Only override this for sandboxes and tests.
    pub base_url: String,
    pub key_id: String,
    pub key_secret: Secret<String>,
    /// Upper bound on a single order-creation round trip. Requests that exceed this are reported as the gateway
    /// being unavailable, and nothing is persisted on our side.
    pub timeout_secs: u64,
}

impl RazorpayConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("RAZORPAY_BASE_URL").unwrap_or_else(|_| {
            debug!("RAZORPAY_BASE_URL not set, using {DEFAULT_RAZORPAY_BASE_URL}");
            DEFAULT_RAZORPAY_BASE_URL.to_string()
        });
        let key_id = std::env::var("RAZORPAY_KEY_ID").unwrap_or_else(|_| {
            warn!("RAZORPAY_KEY_ID not set, using (probably useless) default");
            "rzp_test_0000000000".to_string()
        });
        let key_secret = Secret::new(std::env::var("RAZORPAY_KEY_SECRET").unwrap_or_else(|_| {
            warn!("RAZORPAY_KEY_SECRET not set, using (probably useless) default");
            "00000000000000".to_string()
        }));
        let timeout_secs = std::env::var("CFS_GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_GATEWAY_TIMEOUT_SECS);
        Self { base_url, key_id, key_secret, timeout_secs }
    }
}
