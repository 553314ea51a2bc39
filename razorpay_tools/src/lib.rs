mod api;
mod config;
mod data_objects;
mod error;

pub use api::RazorpayApi;
pub use config::RazorpayConfig;
pub use data_objects::{GatewayOrder, NewGatewayOrder, OrderNotes};
pub use error::RazorpayApiError;
