//! Audit subsystem for the propkeep property-management platform.
//!
//! Records immutable audit entries describing actions taken against tenant
//! resources, answers filtered queries and aggregate statistics, and purges
//! entries older than the configured retention window. The crate is consumed
//! in-process by the request-handling layer; it exposes no network surface of
//! its own.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod types;
