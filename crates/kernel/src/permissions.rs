//! Authorization oracle port and stock implementations.
//!
//! The [`Authorizer`] trait is what menu filtering and route gating ask
//! "is the current user signed in" and "does the current user satisfy
//! this requirement". Requirements are opaque JSON values; only the
//! authorizer gives them meaning.

use std::collections::HashSet;

use anyhow::{Result, bail};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

/// Answers authorization questions about the current user.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Whether the current user is signed in.
    async fn is_authenticated(&self) -> Result<bool>;

    /// Whether the current user satisfies a structured requirement.
    async fn has_permission(&self, requirement: &Value) -> Result<bool>;

    /// Forget any remembered answers. Called when the user's permissions
    /// change.
    fn invalidate(&self) {}
}

/// Authorizer over a fixed set of permission names.
///
/// Requirement forms:
/// - `"ADMIN"`: that permission
/// - `["ADMIN", "AUDIT"]`: all of them
/// - `{"all": [...]}` or `{"permissions": [...]}`: all of them
/// - `{"any": [...]}`: at least one of them
///
/// Anonymous users hold no permissions.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthorizer {
    authenticated: bool,
    permissions: HashSet<String>,
}

impl StaticAuthorizer {
    /// A signed-out user.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed-in user holding the given permissions.
    pub fn authenticated<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            authenticated: true,
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Evaluate a requirement synchronously.
    pub fn satisfies(&self, requirement: &Value) -> Result<bool> {
        if !self.authenticated {
            return Ok(false);
        }

        match requirement {
            Value::String(name) => Ok(self.permissions.contains(name)),
            Value::Array(names) => self.all_of(names),
            Value::Object(map) => {
                if let Some(Value::Array(names)) = map.get("any") {
                    self.any_of(names)
                } else if let Some(Value::Array(names)) =
                    map.get("all").or_else(|| map.get("permissions"))
                {
                    self.all_of(names)
                } else {
                    bail!("unsupported permission requirement: {requirement}")
                }
            }
            other => bail!("unsupported permission requirement: {other}"),
        }
    }

    fn all_of(&self, names: &[Value]) -> Result<bool> {
        let mut granted = true;
        for name in names {
            granted &= self.permissions.contains(permission_name(name)?);
        }
        Ok(granted)
    }

    fn any_of(&self, names: &[Value]) -> Result<bool> {
        let mut granted = false;
        for name in names {
            granted |= self.permissions.contains(permission_name(name)?);
        }
        Ok(granted)
    }
}

fn permission_name(value: &Value) -> Result<&str> {
    match value {
        Value::String(name) => Ok(name),
        other => bail!("permission names must be strings, got {other}"),
    }
}

#[async_trait]
impl Authorizer for StaticAuthorizer {
    async fn is_authenticated(&self) -> Result<bool> {
        Ok(self.authenticated)
    }

    async fn has_permission(&self, requirement: &Value) -> Result<bool> {
        self.satisfies(requirement)
    }
}

/// Memoizes another authorizer's answers.
///
/// Errors are not cached. [`Authorizer::invalidate`] clears the cache, so a
/// menu binding drops stale answers on every permission change.
pub struct CachingAuthorizer<A> {
    inner: A,
    authenticated: RwLock<Option<bool>>,
    decisions: DashMap<String, bool>,
}

impl<A: Authorizer> CachingAuthorizer<A> {
    /// Wrap an authorizer.
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            authenticated: RwLock::new(None),
            decisions: DashMap::new(),
        }
    }

    /// Drop every cached answer.
    pub fn invalidate_all(&self) {
        *self.authenticated.write() = None;
        self.decisions.clear();
        debug!("authorization cache cleared");
    }

    /// Get the number of cached permission decisions (for monitoring).
    pub fn cache_size(&self) -> usize {
        self.decisions.len()
    }

    /// The wrapped authorizer.
    pub fn inner(&self) -> &A {
        &self.inner
    }
}

#[async_trait]
impl<A: Authorizer> Authorizer for CachingAuthorizer<A> {
    async fn is_authenticated(&self) -> Result<bool> {
        let cached = *self.authenticated.read();
        if let Some(authenticated) = cached {
            return Ok(authenticated);
        }

        let authenticated = self.inner.is_authenticated().await?;
        *self.authenticated.write() = Some(authenticated);
        Ok(authenticated)
    }

    async fn has_permission(&self, requirement: &Value) -> Result<bool> {
        // serde_json maps are ordered, so the rendering is canonical.
        let key = requirement.to_string();
        let cached = self.decisions.get(&key).map(|entry| *entry);
        if let Some(granted) = cached {
            return Ok(granted);
        }

        let granted = self.inner.has_permission(requirement).await?;
        self.decisions.insert(key, granted);
        Ok(granted)
    }

    fn invalidate(&self) {
        self.invalidate_all();
        self.inner.invalidate();
    }
}
