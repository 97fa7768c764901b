//! Typed client for the home-service marketplace backend.
//!
//! [`api`] is the transport: one [`ApiClient`](api::ApiClient) that attaches
//! credentials, normalizes failures into [`ApiError`](api::ApiError) and
//! handles uploads. [`services`] maps each backend resource onto typed
//! calls over that client.

pub mod api;
pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;
