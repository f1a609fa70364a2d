//! `webmount-core`: transport-free building blocks for pluggable APIs.
//!
//! This crate knows nothing about HTTP. It defines the values that flow from
//! configuration into handler factories: bindings, options, the listener
//! configuration model and the shared error type.

pub mod binding;
pub mod config;
pub mod error;
pub mod options;

pub use binding::Binding;
pub use config::{ApiConfig, BindPoint, ListenerConfig, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use options::Options;
