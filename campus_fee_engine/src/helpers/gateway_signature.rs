//! # Gateway callback signature format
//!
//! When the gateway hands control back to the client after a payment attempt, it includes a signature so that
//! the server can confirm that the result genuinely originates from the gateway and matches a known order. A
//! client could otherwise claim success for an order it never paid.
//!
//! The signed message is the order id and the gateway payment id, separated by a pipe:
//!
//! ```text
//!    {order_id}|{payment_id}
//! ```
//!
//! The tag is HMAC-SHA256 over that message, keyed with the gateway key secret, transmitted as lowercase hex.
//! The secret is shared between the gateway and this server only; it must never reach a client or a log line.
//!
//! Comparison is constant-time ([`hmac::Mac::verify_slice`]): whether a forged tag diverges in the first or the
//! last byte must not be observable from the response timing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::db_types::OrderId;

type HmacSha256 = Hmac<Sha256>;

pub fn signature_message(order_id: &OrderId, payment_id: &str) -> String {
    format!("{}|{payment_id}", order_id.as_str())
}

/// Compute the hex tag the gateway would attach for the given order and payment id. Used by tests and tooling;
/// the verification path never compares against this string directly.
pub fn sign_callback(secret: &str, order_id: &OrderId, payment_id: &str) -> String {
    let mut mac = mac_for(secret);
    mac.update(signature_message(order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Check a client-supplied hex tag against the expected one in constant time. Undecodable hex can never match.
pub fn verify_callback(secret: &str, order_id: &OrderId, payment_id: &str, provided: &str) -> bool {
    let tag = match hex::decode(provided.trim()) {
        Ok(tag) => tag,
        Err(_) => return false,
    };
    let mut mac = mac_for(secret);
    mac.update(signature_message(order_id, payment_id).as_bytes());
    mac.verify_slice(&tag).is_ok()
}

fn mac_for(secret: &str) -> HmacSha256 {
    // HMAC accepts keys of any length, so this cannot fail for string secrets
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC key of any size is valid")
}

#[cfg(test)]
mod test {
    use super::*;

    const SECRET: &str = "test-gateway-secret";

    #[test]
    fn sign_and_verify_round_trip() {
        let order_id = OrderId::from("order_NXhj4rkO8s".to_string());
        let tag = sign_callback(SECRET, &order_id, "pay_00112233");
        assert!(verify_callback(SECRET, &order_id, "pay_00112233", &tag));
    }

    #[test]
    fn tampered_fields_fail() {
        let order_id = OrderId::from("order_NXhj4rkO8s".to_string());
        let tag = sign_callback(SECRET, &order_id, "pay_00112233");
        assert!(!verify_callback(SECRET, &order_id, "pay_99999999", &tag));
        assert!(!verify_callback(SECRET, &OrderId::from("order_other".to_string()), "pay_00112233", &tag));
        assert!(!verify_callback("wrong-secret", &order_id, "pay_00112233", &tag));
    }

    #[test]
    fn garbage_tags_never_match() {
        let order_id = OrderId::from("order_NXhj4rkO8s".to_string());
        assert!(!verify_callback(SECRET, &order_id, "pay_00112233", "not-hex-at-all"));
        assert!(!verify_callback(SECRET, &order_id, "pay_00112233", ""));
        // valid hex, wrong length
        assert!(!verify_callback(SECRET, &order_id, "pay_00112233", "deadbeef"));
    }

    #[test]
    fn message_layout_is_stable() {
        let order_id = OrderId::from("order_1".to_string());
        assert_eq!(signature_message(&order_id, "pay_1"), "order_1|pay_1");
    }
}
