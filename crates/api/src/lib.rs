//! Pluggable HTTP APIs: handler/factory contract, registry, configuration
//! loading and request dispatch.
//!
//! A *binding* names a kind of API. A [`HandlerFactory`] turns per-instance
//! options into a live [`ApiHandler`] for its binding, and a
//! [`HandlerFactoryRegistry`] lets many factories coexist. [`load`] walks a
//! [`ServerConfig`](webmount_core::ServerConfig), validates each binding group
//! and builds the handlers; each listener's [`Demux`] then routes requests to
//! the handler that claims them.

pub mod dispatch;
pub mod errors;
pub mod factory;
pub mod handler;
pub mod loader;
pub mod middleware;
pub mod mount;
pub mod registry;

pub use dispatch::Demux;
pub use factory::HandlerFactory;
pub use handler::{ApiHandler, is_under_root};
pub use loader::{LoadedListener, LoadedServer, load};
pub use mount::{MountSettings, MountedRouter, RouterFactory};
pub use registry::HandlerFactoryRegistry;

pub use webmount_core::{
    ApiConfig, ApiError, ApiResult, BindPoint, Binding, ListenerConfig, Options, ServerConfig,
};
