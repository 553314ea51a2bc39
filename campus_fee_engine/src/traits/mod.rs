//! The traits that backends and collaborators implement in order to power the engine.
//!
//! * [`PaymentStore`] — the persistent collection of payment records. Sole owner of payment state.
//! * [`OrderGateway`] — the external order-creation collaborator.
//! * [`AccountManagement`] — the slice of user storage the engine needs (claims lookup, admin provisioning).
//! * [`NotificationSink`] — an out-of-band message sink; failures never affect payment state.

mod account_management;
mod notification;
mod order_gateway;
mod payment_store;

pub use account_management::{AccountApiError, AccountManagement};
pub use notification::{LogNotifier, NotificationError, NotificationSink};
pub use order_gateway::{GatewayError, GatewayOrderRequest, GatewayOrderResponse, OrderGateway};
pub use payment_store::{PaymentQueryFilter, PaymentStore, PaymentStoreError};
