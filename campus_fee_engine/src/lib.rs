//! Campus Fee Engine
//!
//! The engine owns the payment order and verification lifecycle for university fee payments. It is
//! gateway-agnostic and HTTP-agnostic: the server crate wires a concrete gateway client and exposes routes on top
//! of the APIs defined here.
//!
//! The library is divided into three main sections:
//! 1. Database management and control ([`mod@sqlite`]). You should never need to access the database directly.
//!    Instead, use the public API provided by the engine. The exception is the data types used in the database,
//!    which are defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@cfe_api`]). This provides the public-facing functionality: issuing gateway
//!    orders against the fee catalog, verifying signed payment callbacks, the completed-payment ledger, and
//!    account provisioning. Backends implement the traits in [`mod@traits`] in order to act as a store for the
//!    engine.
//! 3. Events ([`mod@events`]). When a payment completes, a `PaymentCompletedEvent` is emitted. A simple hook
//!    system lets the server attach out-of-band reactions (e.g. the notification sink) that can never roll back
//!    a completed payment.

pub mod db_types;
pub mod events;
pub mod fee_catalog;
pub mod helpers;
pub mod traits;

pub mod cfe_api;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use cfe_api::{
    errors::PaymentFlowError,
    payment_flow_api::PaymentFlowApi,
    payment_objects,
    provisioning_api::ProvisioningApi,
};
pub use traits::{AccountManagement, GatewayError, OrderGateway, PaymentStore, PaymentStoreError};
