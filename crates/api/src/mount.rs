//! Factory adapter that mounts an axum [`Router`] under a configured path.
//!
//! Most APIs are plain axum routers. [`RouterFactory`] turns such a router
//! into a pluggable binding: each configured instance names its mount path
//! in the `path` option and gets its own router built for its listener.
//!
//! ```ignore
//! let factory = RouterFactory::new("rest-v1", |_listener, _settings| {
//!     Ok(Router::new().route("/widgets", get(list_widgets)))
//! });
//! registry.add(Arc::new(factory))?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::{Router, body::Body, http::Request, response::Response};
use serde::Deserialize;
use tower::ServiceExt;

use webmount_core::{ApiError, ApiResult, Binding, ListenerConfig, Options, ServerConfig};

use crate::{ApiHandler, HandlerFactory, is_under_root};

/// Options understood by [`RouterFactory`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MountSettings {
    /// Path prefix the router is nested under (`"/"` mounts at the root).
    pub path: String,
}

impl MountSettings {
    fn check(&self) -> Result<String, String> {
        if !self.path.starts_with('/') {
            return Err(format!("path '{}' must start with '/'", self.path));
        }
        if self.path.contains(['*', ':', '{', '}']) {
            return Err(format!("path '{}' must not contain route parameters", self.path));
        }
        let trimmed = self.path.trim_end_matches('/');
        Ok(if trimmed.is_empty() { "/".to_string() } else { trimmed.to_string() })
    }
}

type BuildFn = dyn Fn(&ListenerConfig, &MountSettings) -> anyhow::Result<Router> + Send + Sync;
type ValidateFn = dyn Fn(&Binding, &ServerConfig) -> ApiResult<()> + Send + Sync;

/// [`HandlerFactory`] building one nested [`Router`] per configured instance.
pub struct RouterFactory {
    binding: Binding,
    build: Box<BuildFn>,
    validate: Option<Box<ValidateFn>>,
}

impl RouterFactory {
    pub fn new<F>(binding: impl Into<Binding>, build: F) -> Self
    where
        F: Fn(&ListenerConfig, &MountSettings) -> anyhow::Result<Router> + Send + Sync + 'static,
    {
        Self {
            binding: binding.into(),
            build: Box::new(build),
            validate: None,
        }
    }

    /// Add a factory-level check run once per configuration load.
    pub fn with_validation<V>(mut self, validate: V) -> Self
    where
        V: Fn(&Binding, &ServerConfig) -> ApiResult<()> + Send + Sync + 'static,
    {
        self.validate = Some(Box::new(validate));
        self
    }
}

impl core::fmt::Debug for RouterFactory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RouterFactory")
            .field("binding", &self.binding)
            .field("has_validation", &self.validate.is_some())
            .finish()
    }
}

impl HandlerFactory for RouterFactory {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn validate(&self, config: &ServerConfig) -> ApiResult<()> {
        match &self.validate {
            Some(validate) => validate(&self.binding, config),
            None => Ok(()),
        }
    }

    fn new_handler(
        &self,
        listener: &ListenerConfig,
        options: Options,
    ) -> ApiResult<Arc<dyn ApiHandler>> {
        let settings: MountSettings = options
            .decode()
            .map_err(|e| ApiError::invalid_options(&self.binding, e))?;
        let root_path = settings
            .check()
            .map_err(|e| ApiError::invalid_options(&self.binding, e))?;

        let inner = (self.build)(listener, &settings)
            .map_err(|e| ApiError::construction(&self.binding, e))?;
        let router = if root_path == "/" {
            inner
        } else {
            Router::new().nest(&root_path, inner)
        };

        tracing::debug!(
            binding = %self.binding,
            listener = %listener.name,
            root_path = %root_path,
            "mounted router"
        );

        Ok(Arc::new(MountedRouter {
            binding: self.binding.clone(),
            options,
            root_path,
            router,
        }))
    }
}

/// Handler produced by [`RouterFactory`].
#[derive(Debug)]
pub struct MountedRouter {
    binding: Binding,
    options: Options,
    root_path: String,
    router: Router,
}

#[async_trait]
impl ApiHandler for MountedRouter {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn root_path(&self) -> &str {
        &self.root_path
    }

    fn is_handler(&self, request: &Request<Body>) -> bool {
        is_under_root(request.uri().path(), &self.root_path)
    }

    async fn serve(&self, request: Request<Body>) -> Response {
        match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }
}
