use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{config::RazorpayConfig, GatewayOrder, NewGatewayOrder, RazorpayApiError};

#[derive(Clone)]
pub struct RazorpayApi {
    config: RazorpayConfig,
    client: Arc<Client>,
}

impl RazorpayApi {
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RazorpayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Create a new order on the gateway. The returned order id is the handle the client hands to the checkout
    /// widget, and the key we verify the payment callback against later.
    pub async fn create_order(&self, order: NewGatewayOrder) -> Result<GatewayOrder, RazorpayApiError> {
        trace!("Creating gateway order for receipt {}", order.receipt);
        let result: GatewayOrder = self.rest_query(Method::POST, "/v1/orders", Some(order)).await?;
        debug!("Gateway order {} created ({} {})", result.id, result.amount, result.currency);
        Ok(result)
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, RazorpayApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self
            .client
            .request(method, url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.reveal()));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| RazorpayApiError::Unavailable(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| RazorpayApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| RazorpayApiError::Unavailable(e.to_string()))?;
            Err(RazorpayApiError::Rejected { status, message })
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod test {
    use cfs_common::Secret;

    use super::*;

    fn test_config() -> RazorpayConfig {
        RazorpayConfig {
            base_url: "https://api.razorpay.test/".to_string(),
            key_id: "rzp_test_abc".to_string(),
            key_secret: Secret::new("shhh".to_string()),
            timeout_secs: 5,
        }
    }

    #[test]
    fn url_assembly_strips_trailing_slash() {
        let api = RazorpayApi::new(test_config()).unwrap();
        assert_eq!(api.url("/v1/orders"), "https://api.razorpay.test/v1/orders");
    }

    #[test]
    fn secrets_do_not_leak_via_debug() {
        let config = test_config();
        assert_eq!(format!("{:?}", config.key_secret), "****");
    }
}
