//! Binding → factory registry.
//!
//! Registration happens once at startup, from a single thread, before any
//! configuration is loaded. Mutation therefore takes `&mut self` and needs no
//! locking; once every factory is in, wrap the registry in an `Arc` and read
//! it from as many tasks as needed.

use std::collections::HashMap;
use std::sync::Arc;

use webmount_core::{ApiError, ApiResult, Binding};

use crate::HandlerFactory;

/// Maps each binding to exactly one [`HandlerFactory`].
///
/// There is no process-wide default instance: build one and pass it to
/// whatever loads the server configuration.
#[derive(Debug, Default)]
pub struct HandlerFactoryRegistry {
    factories: HashMap<Binding, Arc<dyn HandlerFactory>>,
}

impl HandlerFactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under its binding.
    ///
    /// First writer wins: a second factory for the same binding is rejected
    /// with [`ApiError::DuplicateBinding`] and the registry is left unchanged.
    pub fn add(&mut self, factory: Arc<dyn HandlerFactory>) -> ApiResult<()> {
        let binding = factory.binding().clone();
        tracing::debug!(%binding, "adding api handler factory");

        if self.factories.contains_key(&binding) {
            tracing::warn!(%binding, "api handler factory already registered; keeping the first");
            return Err(ApiError::DuplicateBinding(binding));
        }

        self.factories.insert(binding, factory);
        Ok(())
    }

    /// Factory registered for `binding`, or `None` if nothing claims it.
    pub fn get(&self, binding: &str) -> Option<Arc<dyn HandlerFactory>> {
        self.factories.get(binding).cloned()
    }

    pub fn contains(&self, binding: &str) -> bool {
        self.factories.contains_key(binding)
    }

    /// Registered bindings, sorted.
    pub fn bindings(&self) -> Vec<&Binding> {
        let mut out: Vec<&Binding> = self.factories.keys().collect();
        out.sort();
        out
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
