//! Permission filtering for menu trees.
//!
//! Produces a pruned copy of a menu in which every item linking to a
//! protected route the current user may not visit is removed together
//! with its whole subtree. The input tree is never modified.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use tracing::{debug, warn};

use super::item::MenuItem;
use crate::permissions::Authorizer;
use crate::protection::{Protection, RouteProtectionLookup};

/// Filters menus against route protections.
///
/// Without an authorizer nothing is restricted and filtering returns the
/// input unchanged.
#[derive(Clone)]
pub struct MenuPermissionService {
    routes: Arc<dyn RouteProtectionLookup>,
    authorizer: Option<Arc<dyn Authorizer>>,
}

impl MenuPermissionService {
    /// Create a new permission filter.
    pub fn new(
        routes: Arc<dyn RouteProtectionLookup>,
        authorizer: Option<Arc<dyn Authorizer>>,
    ) -> Self {
        Self { routes, authorizer }
    }

    /// Whether an authorizer is installed.
    pub fn has_authorizer(&self) -> bool {
        self.authorizer.is_some()
    }

    /// Drop answers the authorizer remembered for the previous permissions.
    pub fn invalidate(&self) {
        if let Some(authorizer) = &self.authorizer {
            authorizer.invalidate();
        }
    }

    /// Return a copy of `menu` with denied items pruned.
    ///
    /// The root itself is never checked, so the result always exists even
    /// when every child is denied. Siblings are checked concurrently and a
    /// level is assembled only after all of its checks have settled.
    pub async fn filter(&self, menu: &MenuItem) -> MenuItem {
        let Some(authorizer) = self.authorizer.as_deref() else {
            debug!(menu = %menu.name(), "no authorizer installed, menu left unfiltered");
            return menu.clone();
        };

        let mut root = menu.shell();
        *root.items_mut() = self.filter_children(authorizer, menu.items()).await;

        debug!(
            menu = %menu.name(),
            before = menu.count(),
            after = root.count(),
            "menu filtered"
        );
        root
    }

    fn filter_children<'a>(
        &'a self,
        authorizer: &'a dyn Authorizer,
        items: &'a [MenuItem],
    ) -> BoxFuture<'a, Vec<MenuItem>> {
        async move {
            let checks = items.iter().map(|item| self.filter_item(authorizer, item));
            let checked = join_all(checks).await;

            checked.into_iter().flatten().collect()
        }
        .boxed()
    }

    async fn filter_item(&self, authorizer: &dyn Authorizer, item: &MenuItem) -> Option<MenuItem> {
        if !self.permits(authorizer, item).await {
            return None;
        }

        // A permitted item stays even if all of its children are denied.
        let mut copy = item.shell();
        *copy.items_mut() = self.filter_children(authorizer, item.items()).await;
        Some(copy)
    }

    async fn permits(&self, authorizer: &dyn Authorizer, item: &MenuItem) -> bool {
        let Some(link) = item.link() else {
            return true;
        };
        let Some(protection) = self.routes.lookup(link) else {
            return true;
        };

        let decision = match protection {
            Protection::Authenticated => authorizer.is_authenticated().await,
            Protection::Permission(requirement) => authorizer.has_permission(requirement).await,
        };

        match decision {
            Ok(true) => true,
            Ok(false) => {
                debug!(item = %item.name(), link = %link, "menu item denied");
                false
            }
            Err(e) => {
                warn!(
                    item = %item.name(),
                    link = %link,
                    error = %e,
                    "permission check failed, hiding menu item"
                );
                false
            }
        }
    }
}
