mod gateway_signature;

pub use gateway_signature::{signature_message, sign_callback, verify_callback};
