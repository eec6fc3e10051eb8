//! HTTP API for cardcheck-intake
//!
//! Route builders per concern: card submission, health check, and the
//! static UI fallback.

pub mod health;
pub mod static_assets;
pub mod submit;

pub use health::health_routes;
pub use static_assets::serve_asset;
pub use submit::{submit_routes, SubmissionRequest, SubmissionResponse};
