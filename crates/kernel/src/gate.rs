//! Route access gating.
//!
//! Decides whether navigation to a path may proceed, using the same route
//! protections and authorizer that drive menu filtering.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::permissions::Authorizer;
use crate::protection::{Protection, RouteProtectionLookup};

/// Outcome of a route access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Navigation may proceed.
    Granted,
    /// The user must sign in first.
    LoginRequired,
    /// The user is signed in but lacks the required permission.
    Forbidden,
}

impl Access {
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// Route gate over protections and an optional authorizer.
///
/// Without an authorizer every route is granted.
#[derive(Clone)]
pub struct RouteGate {
    routes: Arc<dyn RouteProtectionLookup>,
    authorizer: Option<Arc<dyn Authorizer>>,
}

impl RouteGate {
    pub fn new(
        routes: Arc<dyn RouteProtectionLookup>,
        authorizer: Option<Arc<dyn Authorizer>>,
    ) -> Self {
        Self { routes, authorizer }
    }

    /// Check access to a path.
    ///
    /// Authorizer errors deny access (reported as [`Access::Forbidden`]).
    pub async fn check(&self, path: &str) -> Access {
        let Some(protection) = self.routes.lookup(path) else {
            return Access::Granted;
        };
        let Some(authorizer) = self.authorizer.as_deref() else {
            return Access::Granted;
        };

        let access = match authorizer.is_authenticated().await {
            Ok(false) => Access::LoginRequired,
            Ok(true) => match protection {
                Protection::Authenticated => Access::Granted,
                Protection::Permission(requirement) => {
                    match authorizer.has_permission(requirement).await {
                        Ok(true) => Access::Granted,
                        Ok(false) => Access::Forbidden,
                        Err(e) => {
                            warn!(path = %path, error = %e, "permission check failed");
                            Access::Forbidden
                        }
                    }
                }
            },
            Err(e) => {
                warn!(path = %path, error = %e, "authentication check failed");
                Access::Forbidden
            }
        };

        debug!(path = %path, ?access, "route access checked");
        access
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::permissions::StaticAuthorizer;
    use crate::protection::RouteProtections;
    use serde_json::json;

    fn gate(user: Option<StaticAuthorizer>) -> RouteGate {
        let mut routes = RouteProtections::new();
        routes
            .require_authenticated("/profile")
            .require_permission("/admin", json!("ADMIN"))
            .require_permission("/broken", json!(3));

        RouteGate::new(
            Arc::new(routes),
            user.map(|u| Arc::new(u) as Arc<dyn Authorizer>),
        )
    }

    // -------------------------------------------------------------------------
    // unprotected routes
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn unprotected_route_is_granted() {
        assert_eq!(
            gate(Some(StaticAuthorizer::anonymous())).check("/").await,
            Access::Granted
        );
    }

    #[tokio::test]
    async fn no_authorizer_grants_everything() {
        let gate = gate(None);
        assert_eq!(gate.check("/admin").await, Access::Granted);
        assert_eq!(gate.check("/profile").await, Access::Granted);
    }

    // -------------------------------------------------------------------------
    // protected routes
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn anonymous_must_log_in() {
        let gate = gate(Some(StaticAuthorizer::anonymous()));
        assert_eq!(gate.check("/profile").await, Access::LoginRequired);
        assert_eq!(gate.check("/admin").await, Access::LoginRequired);
    }

    #[tokio::test]
    async fn missing_permission_is_forbidden() {
        let gate = gate(Some(StaticAuthorizer::authenticated(["EDITOR"])));
        assert_eq!(gate.check("/profile").await, Access::Granted);
        assert_eq!(gate.check("/admin").await, Access::Forbidden);
    }

    #[tokio::test]
    async fn held_permission_is_granted() {
        let gate = gate(Some(StaticAuthorizer::authenticated(["ADMIN"])));
        assert!(gate.check("/admin").await.is_granted());
    }

    #[tokio::test]
    async fn authorizer_error_is_forbidden() {
        let gate = gate(Some(StaticAuthorizer::authenticated(["ADMIN"])));
        assert_eq!(gate.check("/broken").await, Access::Forbidden);
    }

    #[test]
    fn access_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(Access::LoginRequired).unwrap(),
            json!("login_required")
        );
    }
}
