use std::borrow::{Borrow, Cow};

use serde::{Deserialize, Serialize};

/// Name of a kind of pluggable API (e.g. `"rest-v1"`).
///
/// Bindings are opaque strings compared by exact, case-sensitive equality.
/// No trimming or normalisation is applied: `"rest-v1"`, `"Rest-v1"` and
/// `" rest-v1"` are three different bindings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Binding(Cow<'static, str>);

impl Binding {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Binding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Binding {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Binding {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Binding {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Binding {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl PartialEq<str> for Binding {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Binding {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
