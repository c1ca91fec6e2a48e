//! Waymark test utilities.
//!
//! Helpers for integration testing: a scriptable mock authorizer, menu
//! fixtures, and assertion utilities for menu trees.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use waymark_kernel::{Authorizer, MenuItem, MenuResult, NewMenuItem, RouteProtections};

/// Scriptable authorizer for tests.
///
/// Grants are requirement values compared by equality. Every call is
/// counted, and the peak number of calls in flight at once is recorded so
/// tests can observe concurrent sibling checks.
#[derive(Debug, Default)]
pub struct MockAuthorizer {
    authenticated: RwLock<bool>,
    grant_all: RwLock<bool>,
    granted: RwLock<Vec<Value>>,
    failing: RwLock<Vec<Value>>,
    delay: RwLock<Option<Duration>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockAuthorizer {
    /// A signed-in user holding nothing.
    pub fn new() -> Self {
        let mock = Self::default();
        *mock.authenticated.write() = true;
        mock
    }

    /// A signed-in user granted every requirement.
    pub fn grant_all() -> Self {
        let mock = Self::new();
        *mock.grant_all.write() = true;
        mock
    }

    /// A signed-out user; every check is denied.
    pub fn deny_all() -> Self {
        Self::default()
    }

    /// Grant a requirement.
    pub fn with_grant(self, requirement: Value) -> Self {
        self.grant(requirement);
        self
    }

    /// Make checks of a requirement fail with an error.
    pub fn with_failure(self, requirement: Value) -> Self {
        self.failing.write().push(requirement);
        self
    }

    /// Delay every answer.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.set_delay(Some(delay));
        self
    }

    /// Grant a requirement after construction.
    pub fn grant(&self, requirement: Value) {
        self.granted.write().push(requirement);
    }

    /// Revoke every grant.
    pub fn revoke_all(&self) {
        self.granted.write().clear();
        *self.grant_all.write() = false;
    }

    /// Change the answer delay.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write() = delay;
    }

    /// Sign the user in or out.
    pub fn set_authenticated(&self, authenticated: bool) {
        *self.authenticated.write() = authenticated;
    }

    /// Total calls answered or in progress.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls in progress at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Authorizer for MockAuthorizer {
    async fn is_authenticated(&self) -> Result<bool> {
        self.enter().await;
        let authenticated = *self.authenticated.read();
        self.leave();
        Ok(authenticated)
    }

    async fn has_permission(&self, requirement: &Value) -> Result<bool> {
        self.enter().await;
        let failing = self.failing.read().contains(requirement);
        let granted = *self.authenticated.read()
            && (*self.grant_all.read() || self.granted.read().contains(requirement));
        self.leave();

        if failing {
            bail!("mock failure for {requirement}");
        }
        Ok(granted)
    }
}

/// Menu fixtures.
pub mod menus {
    use super::*;
    use serde_json::json;

    /// The claims-import menu:
    ///
    /// ```text
    /// main
    /// ├── import (/import)
    /// │   ├── claim (/import/claim, active on /import/claim(/.*)?)
    /// │   └── damage (/import/damage)
    /// ├── admin (/admin)
    /// │   ├── users (/admin/users)
    /// │   └── audit (/admin/audit)
    /// ├── reports (no link)
    /// │   └── monthly (/reports/monthly)
    /// └── docs (https://docs.example.com)
    /// ```
    pub fn claims_menu() -> MenuResult<MenuItem> {
        let mut root = MenuItem::root("main")?;

        root.create_sub_menu("import", NewMenuItem::new("Import").with_link("/import"))?
            .add_item(
                "claim",
                NewMenuItem::new("Claims")
                    .with_link("/import/claim")
                    .with_active_route("/import/claim(/.*)?"),
            )?
            .add_item(
                "damage",
                NewMenuItem::new("Damage").with_link("/import/damage"),
            )?;

        root.create_sub_menu("admin", NewMenuItem::new("Admin").with_link("/admin"))?
            .add_item("users", NewMenuItem::new("Users").with_link("/admin/users"))?
            .add_item("audit", NewMenuItem::new("Audit").with_link("/admin/audit"))?;

        root.create_sub_menu("reports", NewMenuItem::new("Reports"))?
            .add_item(
                "monthly",
                NewMenuItem::new("Monthly").with_link("/reports/monthly"),
            )?;

        root.add_item(
            "docs",
            NewMenuItem::new("Docs")
                .with_link("https://docs.example.com")
                .with_option("target", json!("_blank")),
        )?;

        Ok(root)
    }

    /// Protections matching [`claims_menu`].
    pub fn claims_protections() -> RouteProtections {
        let mut routes = RouteProtections::new();
        routes
            .require_permission("/import/claim", json!(["CLAIMS"]))
            .require_authenticated("/import/damage")
            .require_permission("/admin", json!("ADMIN"))
            .require_permission("/admin/users", json!("USER_ADMIN"))
            .require_permission("/admin/audit", json!("AUDIT"))
            .require_permission("/reports/monthly", json!("REPORTS"));
        routes
    }
}

/// Assertion helpers for menu trees.
pub mod assert {
    use super::*;

    /// Names of an item's direct children, in order.
    pub fn child_names(item: &MenuItem) -> Vec<String> {
        item.items().iter().map(|i| i.name().to_string()).collect()
    }

    /// Names of every active item in a tree, pre-order.
    pub fn active_names(item: &MenuItem) -> Vec<String> {
        let mut names = Vec::new();
        collect(item, &mut |i| {
            if i.is_active() {
                names.push(i.name().to_string());
            }
        });
        names
    }

    /// Names of every item in a tree, pre-order.
    pub fn all_names(item: &MenuItem) -> Vec<String> {
        let mut names = Vec::new();
        collect(item, &mut |i| names.push(i.name().to_string()));
        names
    }

    /// Assert a tree contains exactly the given items (order-insensitive).
    pub fn has_exactly(item: &MenuItem, expected: &[&str]) {
        let actual: HashSet<String> = all_names(item).into_iter().collect();
        let expected: HashSet<String> = expected.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            actual, expected,
            "menu items differ\nactual: {actual:?}\nexpected: {expected:?}"
        );
    }

    fn collect(item: &MenuItem, visit: &mut impl FnMut(&MenuItem)) {
        visit(item);
        for child in item.items() {
            collect(child, visit);
        }
    }
}
