//! HTTP API layer for graduon-rs.
//!
//! This crate provides the REST surface over the core services:
//!
//! - **Endpoints**: local auth, OAuth logins, students, courses
//! - **Extractors**: authenticated-identity extraction
//! - **Middleware**: cookie-based identity resolution
//! - **Cookies**: per-scheme session cookie issuance and clearing
//!
//! Built on Axum 0.8 with Tower middleware stack.

// Allow dead_code for API compatibility fields in request structs
#![allow(dead_code)]

pub mod cookies;
pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
