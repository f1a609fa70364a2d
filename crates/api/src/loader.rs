//! Turns a parsed [`ServerConfig`] into live handlers, one [`Demux`] per listener.
//!
//! ## Load order
//!
//! ```text
//! ServerConfig
//!   ↓
//! 1. Structural validation (listeners, bind points, apis)
//!   ↓
//! 2. Resolve every distinct binding to a factory (unknown binding → abort)
//!   ↓
//! 3. factory.validate(config), once per binding, first-appearance order
//!   ↓
//! 4. factory.new_handler(listener, options), once per declared api
//!   ↓
//! LoadedServer { listeners: [LoadedListener { name, bind_points, demux }] }
//! ```
//!
//! Every step must fully succeed before the next one starts, so a failing
//! `validate` means no handler was ever constructed. Any error aborts the
//! whole load; APIs are never silently dropped.

use std::sync::Arc;

use axum::Router;

use webmount_core::{ApiError, ApiResult, BindPoint, Binding, ServerConfig};

use crate::{Demux, HandlerFactory, HandlerFactoryRegistry};

/// Handlers built for one listener.
#[derive(Debug, Clone)]
pub struct LoadedListener {
    pub name: String,
    pub bind_points: Vec<BindPoint>,
    pub demux: Demux,
}

impl LoadedListener {
    /// Router for this listener; binding sockets is up to the caller.
    pub fn router(&self) -> Router {
        self.demux.clone().into_router()
    }
}

/// Result of a successful configuration load.
#[derive(Debug, Clone, Default)]
pub struct LoadedServer {
    pub listeners: Vec<LoadedListener>,
}

impl LoadedServer {
    pub fn listener(&self, name: &str) -> Option<&LoadedListener> {
        self.listeners.iter().find(|l| l.name == name)
    }

    /// Total number of handlers across all listeners.
    pub fn handler_count(&self) -> usize {
        self.listeners.iter().map(|l| l.demux.len()).sum()
    }
}

/// Validate `config` and build every declared handler using `registry`.
pub fn load(registry: &HandlerFactoryRegistry, config: &ServerConfig) -> ApiResult<LoadedServer> {
    config.validate()?;

    let factories = resolve_factories(registry, config)?;

    for (binding, factory) in &factories {
        tracing::debug!(%binding, "validating api binding");
        if let Err(e) = factory.validate(config) {
            tracing::error!(%binding, error = %e, "api binding failed validation");
            return Err(e);
        }
    }

    let mut listeners = Vec::with_capacity(config.listeners.len());
    for listener in &config.listeners {
        let mut demux = Demux::new();
        for api in &listener.apis {
            let factory = factories
                .iter()
                .find(|(binding, _)| *binding == &api.binding)
                .map(|(_, factory)| factory)
                .ok_or_else(|| ApiError::UnknownBinding {
                    listener: listener.name.clone(),
                    binding: api.binding.clone(),
                })?;

            let handler = match factory.new_handler(listener, api.options.clone()) {
                Ok(handler) => handler,
                Err(e) => {
                    tracing::error!(
                        binding = %api.binding,
                        listener = %listener.name,
                        error = %e,
                        "failed to construct api handler"
                    );
                    return Err(e);
                }
            };

            if handler.binding() != factory.binding() {
                return Err(ApiError::BindingMismatch {
                    expected: factory.binding().clone(),
                    actual: handler.binding().clone(),
                });
            }

            tracing::info!(
                binding = %api.binding,
                listener = %listener.name,
                root_path = handler.root_path(),
                "api handler ready"
            );
            demux.push(handler);
        }

        listeners.push(LoadedListener {
            name: listener.name.clone(),
            bind_points: listener.bind_points.clone(),
            demux,
        });
    }

    Ok(LoadedServer { listeners })
}

fn resolve_factories<'a>(
    registry: &HandlerFactoryRegistry,
    config: &'a ServerConfig,
) -> ApiResult<Vec<(&'a Binding, Arc<dyn HandlerFactory>)>> {
    config
        .bindings()
        .into_iter()
        .map(|binding| match registry.get(binding.as_str()) {
            Some(factory) => Ok((binding, factory)),
            None => {
                let listener = config
                    .listeners
                    .iter()
                    .find(|l| l.apis.iter().any(|api| &api.binding == binding))
                    .map(|l| l.name.clone())
                    .unwrap_or_default();
                tracing::error!(%binding, %listener, "no api handler factory registered");
                Err(ApiError::UnknownBinding {
                    listener,
                    binding: binding.clone(),
                })
            }
        })
        .collect()
}
