//! HTTP backend client for the point-of-sale core.
//!
//! Provides [`HttpBackend`], a [`PosBackend`](session::PosBackend) over the
//! REST API, together with environment configuration and logging setup used
//! by the `pos` binary.

pub mod config;
pub mod error;
pub mod http;
pub mod telemetry;

pub use config::{Config, LogFormat};
pub use error::{ConfigError, error_from_status, error_from_transport, response_detail};
pub use http::HttpBackend;
