//! Error model for registration, configuration loading and handler construction.

use thiserror::Error;

use crate::Binding;

/// Result type used across the plugin contract.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure surfaced by `add`, `validate` or `new_handler`.
///
/// None of these are retried; the caller decides whether to abort startup.
/// An absent factory is *not* an error at the registry level (lookups return
/// `None`); it only becomes [`ApiError::UnknownBinding`] when configuration
/// asks for it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A factory for this binding is already registered.
    #[error("binding [{0}] already registered")]
    DuplicateBinding(Binding),

    /// Configuration declares an API whose binding has no registered factory.
    #[error("listener '{listener}' declares api binding [{binding}] but no factory is registered for it")]
    UnknownBinding { listener: String, binding: Binding },

    /// Structural configuration failure (missing listeners, bad bind points, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A factory rejected the configuration shared by all of its instances.
    #[error("validation failed for binding [{binding}]: {reason}")]
    Validation { binding: Binding, reason: String },

    /// A factory could not make sense of one instance's options.
    #[error("invalid options for binding [{binding}]: {reason}")]
    InvalidOptions { binding: Binding, reason: String },

    /// A factory accepted the options but failed to build the handler.
    #[error("failed to construct handler for binding [{binding}]: {source}")]
    Construction {
        binding: Binding,
        #[source]
        source: anyhow::Error,
    },

    /// A factory returned a handler reporting a different binding than its own.
    #[error("factory for binding [{expected}] produced a handler with binding [{actual}]")]
    BindingMismatch { expected: Binding, actual: Binding },
}

impl ApiError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn validation(binding: &Binding, reason: impl Into<String>) -> Self {
        Self::Validation {
            binding: binding.clone(),
            reason: reason.into(),
        }
    }

    pub fn invalid_options(binding: &Binding, reason: impl core::fmt::Display) -> Self {
        Self::InvalidOptions {
            binding: binding.clone(),
            reason: reason.to_string(),
        }
    }

    pub fn construction(binding: &Binding, source: impl Into<anyhow::Error>) -> Self {
        Self::Construction {
            binding: binding.clone(),
            source: source.into(),
        }
    }

    /// The binding this error concerns, when there is one.
    pub fn binding(&self) -> Option<&Binding> {
        match self {
            Self::DuplicateBinding(binding)
            | Self::UnknownBinding { binding, .. }
            | Self::Validation { binding, .. }
            | Self::InvalidOptions { binding, .. }
            | Self::Construction { binding, .. } => Some(binding),
            Self::BindingMismatch { expected, .. } => Some(expected),
            Self::InvalidConfig(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_binding_message() {
        let err = ApiError::DuplicateBinding(Binding::new("rest-v1"));
        assert_eq!(err.to_string(), "binding [rest-v1] already registered");
    }

    #[test]
    fn construction_keeps_its_source() {
        let binding = Binding::new("rest-v1");
        let err = ApiError::construction(&binding, anyhow::anyhow!("upstream unreachable"));
        assert_eq!(
            err.to_string(),
            "failed to construct handler for binding [rest-v1]: upstream unreachable"
        );
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.binding(), Some(&binding));
    }

    #[test]
    fn config_errors_have_no_binding() {
        assert!(ApiError::invalid_config("no listeners").binding().is_none());
    }
}
