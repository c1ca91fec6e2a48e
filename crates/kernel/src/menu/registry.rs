//! Menu registry - holds named menu trees for the lifetime of the process.
//!
//! Each registered menu owns the canonical, unfiltered definition of its
//! tree. Permission filtering and active marking always work on copies, so
//! the registered tree only changes through explicit edits.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tracing::{debug, info};

use super::item::MenuItem;
use crate::error::{MenuError, MenuResult};

static GLOBAL: LazyLock<MenuRegistry> = LazyLock::new(MenuRegistry::new);

/// A registered menu: its name, rendering template and root item.
#[derive(Debug)]
pub struct Menu {
    name: String,
    template: String,
    root: RwLock<MenuItem>,
}

impl Menu {
    /// Menu name (also the root item's name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template the rendering layer should use for this menu.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Mutate the canonical tree.
    pub fn edit<R>(&self, f: impl FnOnce(&mut MenuItem) -> R) -> R {
        f(&mut self.root.write())
    }

    /// Read the canonical tree without copying it.
    pub fn read<R>(&self, f: impl FnOnce(&MenuItem) -> R) -> R {
        f(&self.root.read())
    }

    /// Structural copy of the canonical tree.
    pub fn snapshot(&self) -> MenuItem {
        self.root.read().clone()
    }
}

/// Registry of named menus.
#[derive(Debug, Default)]
pub struct MenuRegistry {
    menus: RwLock<HashMap<String, Arc<Menu>>>,
}

impl MenuRegistry {
    /// Create an empty menu registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static MenuRegistry {
        &GLOBAL
    }

    /// Create an empty menu and register it under `name`.
    ///
    /// Fails if the name is empty or already registered.
    pub fn create_menu(&self, name: &str, template: impl Into<String>) -> MenuResult<Arc<Menu>> {
        let root = MenuItem::root(name)?;

        let mut menus = self.menus.write();
        if menus.contains_key(name) {
            return Err(MenuError::DuplicateMenu(name.to_string()));
        }

        let menu = Arc::new(Menu {
            name: name.to_string(),
            template: template.into(),
            root: RwLock::new(root),
        });
        menus.insert(name.to_string(), Arc::clone(&menu));

        info!(menu = %name, template = %menu.template, "menu created");
        Ok(menu)
    }

    /// Get a menu by name.
    pub fn menu(&self, name: &str) -> Option<Arc<Menu>> {
        self.menus.read().get(name).cloned()
    }

    /// Remove a menu. Returns whether it was registered.
    pub fn remove_menu(&self, name: &str) -> bool {
        let removed = self.menus.write().remove(name).is_some();
        debug!(menu = %name, removed, "menu removal requested");
        removed
    }

    /// Names of all registered menus, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.menus.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Get menu count.
    pub fn len(&self) -> usize {
        self.menus.read().len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.menus.read().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::menu::NewMenuItem;

    #[test]
    fn create_and_lookup() {
        let registry = MenuRegistry::new();
        let menu = registry.create_menu("main", "nav/main.html").unwrap();

        assert_eq!(menu.name(), "main");
        assert_eq!(menu.template(), "nav/main.html");
        assert_eq!(menu.snapshot().name(), "main");
        assert!(registry.menu("main").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_name_fails() {
        let registry = MenuRegistry::new();
        registry.create_menu("main", "a.html").unwrap();

        let err = registry.create_menu("main", "b.html").unwrap_err();
        assert!(matches!(err, MenuError::DuplicateMenu(ref name) if name == "main"));
        assert_eq!(registry.menu("main").unwrap().template(), "a.html");
    }

    #[test]
    fn missing_menu_is_none() {
        let registry = MenuRegistry::new();
        assert!(registry.menu("nope").is_none());
        assert!(!registry.remove_menu("nope"));
    }

    #[test]
    fn remove_then_recreate() {
        let registry = MenuRegistry::new();
        registry.create_menu("main", "a.html").unwrap();
        assert!(registry.remove_menu("main"));
        assert!(registry.is_empty());
        assert!(registry.create_menu("main", "a.html").is_ok());
    }

    #[test]
    fn edits_are_visible_through_lookup() {
        let registry = MenuRegistry::new();
        let menu = registry.create_menu("main", "a.html").unwrap();
        menu.edit(|root| {
            root.add_item("home", NewMenuItem::new("Home").with_link("/"))
                .map(|_| ())
        })
        .unwrap();

        let found = registry.menu("main").unwrap();
        assert!(found.read(|root| root.find_item("home").is_some()));
    }

    #[test]
    fn snapshot_is_detached() {
        let registry = MenuRegistry::new();
        let menu = registry.create_menu("main", "a.html").unwrap();
        let mut copy = menu.snapshot();
        copy.add_item("x", NewMenuItem::new("X")).unwrap();

        assert_eq!(menu.read(MenuItem::count), 1);
    }

    #[test]
    fn names_are_sorted() {
        let registry = MenuRegistry::new();
        registry.create_menu("main", "a.html").unwrap();
        registry.create_menu("footer", "b.html").unwrap();
        assert_eq!(registry.names(), vec!["footer", "main"]);
    }
}
