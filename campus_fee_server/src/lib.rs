//! # Campus fee server
//! This crate hosts the HTTP surface of the campus fee gateway. It is responsible for:
//! * Authenticating students and staff via JWT bearer tokens.
//! * Mapping loosely-typed request bodies onto the engine's closed types at the boundary.
//! * Issuing payment orders and relaying signed gateway callbacks to the verification engine.
//! * Rate-limiting the payment endpoints with a bounded sliding window.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `GET  /health` — liveness probe, no auth.
//! * `POST /api/payments/order` — create a gateway order for a fee payment.
//! * `POST /api/payments/verify` — verify a signed payment callback.
//! * `GET  /api/payments/history` — the calling student's payment history.
//! * `GET  /api/payments/all` — staff-only listing with filters.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
