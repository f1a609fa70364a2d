//! Handler factories: one per binding, turning configuration into handlers.

use std::sync::Arc;

use webmount_core::{ApiResult, Binding, ListenerConfig, Options, ServerConfig};

use crate::ApiHandler;

/// Builds [`ApiHandler`]s for one binding.
///
/// A factory may be shared by many servers and lives at least as long as the
/// registry holding it. It decides for itself whether instances share state;
/// by default they must not.
///
/// ## Lifecycle during configuration load
///
/// 1. [`validate`](HandlerFactory::validate) runs once for the binding,
///    before any instance is built. It checks what only makes sense in
///    aggregate (e.g. "at most one TLS-only instance", or references to other
///    configuration sections) and must not affect other bindings.
/// 2. [`new_handler`](HandlerFactory::new_handler) runs once per declared
///    instance. Malformed options fail the call; a half-built handler is
///    never returned.
///
/// Errors from either step are terminal for the load and are not retried.
pub trait HandlerFactory: Send + Sync {
    /// Binding used in configuration. Must never change.
    fn binding(&self) -> &Binding;

    /// Factory-level checks over the whole server configuration.
    fn validate(&self, config: &ServerConfig) -> ApiResult<()>;

    /// Build one handler for `listener` from its declared `options`.
    ///
    /// The factory owns the meaning of `options`; decode them with
    /// [`Options::decode`] into typed settings.
    fn new_handler(
        &self,
        listener: &ListenerConfig,
        options: Options,
    ) -> ApiResult<Arc<dyn ApiHandler>>;
}

impl core::fmt::Debug for dyn HandlerFactory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerFactory")
            .field("binding", self.binding())
            .finish_non_exhaustive()
    }
}
