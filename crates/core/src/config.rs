//! Server and listener configuration model.
//!
//! These values arrive fully parsed; reading them from files or the
//! environment belongs to the embedding server. [`ServerConfig::validate`]
//! performs the structural checks that must pass before any factory is
//! consulted.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiResult, Binding, Options};

/// Server-level configuration: every listener and the APIs mounted on it.
///
/// Factories receive this in `validate` so they can reason about all of
/// their instances at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub listeners: Vec<ListenerConfig>,
}

/// One named listener: where it binds and which APIs it serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenerConfig {
    pub name: String,
    #[serde(default)]
    pub bind_points: Vec<BindPoint>,
    #[serde(default)]
    pub apis: Vec<ApiConfig>,
}

/// A local interface to listen on plus the address clients use to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindPoint {
    /// `host:port` to listen on.
    pub interface: String,
    /// Externally advertised `host:port`.
    pub address: String,
}

/// One declared API instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub binding: Binding,
    #[serde(default)]
    pub options: Options,
}

impl ApiConfig {
    pub fn new(binding: impl Into<Binding>, options: Options) -> Self {
        Self {
            binding: binding.into(),
            options,
        }
    }
}

impl BindPoint {
    pub fn new(interface: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            address: address.into(),
        }
    }

    fn validate(&self, listener: &str, idx: usize) -> ApiResult<()> {
        validate_host_port(&self.interface).map_err(|reason| {
            ApiError::invalid_config(format!(
                "listener '{listener}' bind point {idx}: interface '{}' {reason}",
                self.interface
            ))
        })?;
        validate_host_port(&self.address).map_err(|reason| {
            ApiError::invalid_config(format!(
                "listener '{listener}' bind point {idx}: address '{}' {reason}",
                self.address
            ))
        })
    }
}

impl ListenerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bind_points: Vec::new(),
            apis: Vec::new(),
        }
    }

    pub fn with_bind_point(mut self, bind_point: BindPoint) -> Self {
        self.bind_points.push(bind_point);
        self
    }

    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.apis.push(api);
        self
    }

    pub fn validate(&self) -> ApiResult<()> {
        if self.name.trim().is_empty() {
            return Err(ApiError::invalid_config("listener name must not be empty"));
        }
        if self.bind_points.is_empty() {
            return Err(ApiError::invalid_config(format!(
                "listener '{}' must declare at least one bind point",
                self.name
            )));
        }
        if self.apis.is_empty() {
            return Err(ApiError::invalid_config(format!(
                "listener '{}' must declare at least one api",
                self.name
            )));
        }
        for (idx, bp) in self.bind_points.iter().enumerate() {
            bp.validate(&self.name, idx)?;
        }
        Ok(())
    }
}

impl ServerConfig {
    pub fn new(listeners: Vec<ListenerConfig>) -> Self {
        Self { listeners }
    }

    /// Structural validation; no factory is consulted.
    pub fn validate(&self) -> ApiResult<()> {
        if self.listeners.is_empty() {
            return Err(ApiError::invalid_config("at least one listener is required"));
        }

        let mut names: HashSet<&str> = HashSet::new();
        for listener in &self.listeners {
            listener.validate()?;
            if !names.insert(listener.name.as_str()) {
                return Err(ApiError::invalid_config(format!(
                    "duplicate listener name '{}'",
                    listener.name
                )));
            }
        }
        Ok(())
    }

    /// Distinct bindings in order of first appearance.
    pub fn bindings(&self) -> Vec<&Binding> {
        let mut seen: HashSet<&Binding> = HashSet::new();
        self.listeners
            .iter()
            .flat_map(|l| l.apis.iter())
            .map(|api| &api.binding)
            .filter(|b| seen.insert(*b))
            .collect()
    }

    /// Every declared instance of `binding`, paired with its listener.
    pub fn apis_for<'a>(
        &'a self,
        binding: &'a Binding,
    ) -> impl Iterator<Item = (&'a ListenerConfig, &'a ApiConfig)> + 'a {
        self.listeners.iter().flat_map(move |l| {
            l.apis
                .iter()
                .filter(move |api| &api.binding == binding)
                .map(move |api| (l, api))
        })
    }
}

fn validate_host_port(value: &str) -> Result<(), &'static str> {
    let (host, port) = value.rsplit_once(':').ok_or("must be in host:port form")?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err("has an empty host");
    }
    port.parse::<u16>().map_err(|_| "has an invalid port")?;
    Ok(())
}
