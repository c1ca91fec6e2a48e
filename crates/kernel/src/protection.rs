//! Route protection requirements.
//!
//! Maps application paths to what a user needs before the route (and any
//! menu item linking to it) is available. Requirements other than "signed
//! in" are opaque here; only the authorizer interprets them.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// What a protected route requires.
#[derive(Debug, Clone, PartialEq)]
pub enum Protection {
    /// Any authenticated user (declared as `true`).
    Authenticated,
    /// A structured requirement handed to the authorizer as-is.
    Permission(Value),
}

impl Protection {
    /// Interpret a declared requirement.
    ///
    /// `true` means authenticated; `false` and `null` mean unprotected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(true) => Some(Self::Authenticated),
            Value::Bool(false) | Value::Null => None,
            other => Some(Self::Permission(other)),
        }
    }
}

impl Serialize for Protection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Authenticated => serializer.serialize_bool(true),
            Self::Permission(value) => value.serialize(serializer),
        }
    }
}

/// Source of route protection requirements.
pub trait RouteProtectionLookup: Send + Sync {
    /// Requirement for an exact path, if the path is protected.
    fn lookup(&self, path: &str) -> Option<&Protection>;
}

/// In-memory route protection map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RouteProtections {
    routes: HashMap<String, Protection>,
}

impl RouteProtections {
    /// Create an empty map (nothing protected).
    pub fn new() -> Self {
        Self::default()
    }

    /// Protect a path.
    pub fn protect(&mut self, path: impl Into<String>, protection: Protection) -> &mut Self {
        self.routes.insert(path.into(), protection);
        self
    }

    /// Require any authenticated user for a path.
    pub fn require_authenticated(&mut self, path: impl Into<String>) -> &mut Self {
        self.protect(path, Protection::Authenticated)
    }

    /// Require a structured permission for a path.
    pub fn require_permission(&mut self, path: impl Into<String>, requirement: Value) -> &mut Self {
        self.protect(path, Protection::Permission(requirement))
    }

    /// Get protected path count.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if no path is protected.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteProtectionLookup for RouteProtections {
    fn lookup(&self, path: &str) -> Option<&Protection> {
        self.routes.get(path)
    }
}

impl<'de> Deserialize<'de> for RouteProtections {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let declared = HashMap::<String, Value>::deserialize(deserializer)?;
        let routes = declared
            .into_iter()
            .filter_map(|(path, value)| Protection::from_value(value).map(|p| (path, p)))
            .collect();
        Ok(Self { routes })
    }
}
