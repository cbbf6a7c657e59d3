//! # API Shared
//!
//! Shared definitions for the Recipebox APIs.
//!
//! Contains:
//! - Request and response bodies with OpenAPI schemas (`dto` module)
//! - Shared services like `HealthService`
//! - Bearer token parsing
//!
//! Used by `api-rest` and the `recipebox-run` binary.

pub mod auth;
pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
