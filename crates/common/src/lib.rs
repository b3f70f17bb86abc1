//! Common utilities and shared types for graduon-rs.
//!
//! This crate provides foundational components used across all graduon-rs
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Token codec**: Signed session-cookie values via [`TokenCodec`]
//! - **Verification codes**: Code generation for email verification and
//!   password reset
//!
//! # Example
//!
//! ```no_run
//! use graduon_common::{AppResult, Config, TokenCodec};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let codec = TokenCodec::new(&config.auth.cookie_secret);
//!     let token = codec.sign("alice@example.com");
//!     assert!(codec.verify(&token).is_some());
//!     Ok(())
//! }
//! ```

pub mod code;
pub mod config;
pub mod error;
pub mod token;

pub use code::{generate_verification_code, VERIFICATION_CODE_LENGTH};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use token::TokenCodec;
