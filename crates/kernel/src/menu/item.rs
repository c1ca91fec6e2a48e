//! Menu item tree.
//!
//! A menu is a tree of named items. Items are validated when they are
//! built, so a tree that exists is always well-formed: every internal link
//! starts with `/` and every active-route pattern compiles.

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{MenuError, MenuResult};

/// Link prefixes treated as external URLs.
pub const EXTERNAL_SCHEMES: &[&str] = &["http://", "https://", "ftp://", "mailto:", "tel:"];

/// Check whether a link points outside the application.
pub fn is_external_link(link: &str) -> bool {
    EXTERNAL_SCHEMES.iter().any(|scheme| {
        link.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// A compiled active-route pattern.
///
/// The pattern is anchored at both ends and matched case-insensitively, so
/// `/import/claim(/.*)?` matches `/Import/Claim/new` but not `/x/import/claim`.
#[derive(Clone)]
pub struct ActiveRoute {
    pattern: String,
    regex: Regex,
}

impl ActiveRoute {
    /// Compile a pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&format!("^(?:{pattern})$"))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check whether a path matches the whole pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl fmt::Debug for ActiveRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActiveRoute").field(&self.pattern).finish()
    }
}

impl PartialEq for ActiveRoute {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Serialize for ActiveRoute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pattern)
    }
}

impl<'de> Deserialize<'de> for ActiveRoute {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        Self::new(&pattern).map_err(D::Error::custom)
    }
}

/// Input for creating a menu item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMenuItem {
    /// Display label. Defaults to the item name.
    pub text: Option<String>,
    /// Internal path (must start with `/`) or external URL.
    pub link: Option<String>,
    /// Pattern marking nested paths as active.
    pub active_route: Option<String>,
    /// Rendering hints, passed through untouched.
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl NewMenuItem {
    /// Create input with a display label.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Set the link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Set the active-route pattern.
    pub fn with_active_route(mut self, pattern: impl Into<String>) -> Self {
        self.active_route = Some(pattern.into());
        self
    }

    /// Add a rendering hint.
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// A node in a navigation tree.
///
/// The root of a menu is an ordinary item; it just has no parent. Child
/// order is display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItem {
    name: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    active_route: Option<ActiveRoute>,
    items: Vec<MenuItem>,
    active: bool,
    #[serde(skip_serializing_if = "Map::is_empty")]
    options: Map<String, Value>,
}

impl MenuItem {
    /// Create an empty root item.
    pub fn root(name: &str) -> MenuResult<Self> {
        Self::build(name, NewMenuItem::default())
    }

    /// Build a detached item, validating its name, link and active route.
    pub fn build(name: &str, input: NewMenuItem) -> MenuResult<Self> {
        if name.trim().is_empty() {
            return Err(MenuError::MissingName);
        }

        if let Some(ref link) = input.link
            && !is_external_link(link)
            && !link.starts_with('/')
        {
            return Err(MenuError::InvalidLink {
                item: name.to_string(),
                link: link.clone(),
            });
        }

        let active_route = input
            .active_route
            .map(|pattern| {
                ActiveRoute::new(&pattern).map_err(|source| MenuError::InvalidActiveRoute {
                    item: name.to_string(),
                    pattern,
                    source,
                })
            })
            .transpose()?;

        Ok(Self {
            name: name.to_string(),
            text: input.text.unwrap_or_else(|| name.to_string()),
            link: input.link,
            active_route,
            items: Vec::new(),
            active: false,
            options: input.options,
        })
    }

    /// Append a child and return the receiver for chaining siblings.
    pub fn add_item(&mut self, name: &str, input: NewMenuItem) -> MenuResult<&mut Self> {
        let child = Self::build(name, input)?;
        self.items.push(child);
        Ok(self)
    }

    /// Append a child and return the child for chaining its own children.
    pub fn create_sub_menu(&mut self, name: &str, input: NewMenuItem) -> MenuResult<&mut Self> {
        let child = Self::build(name, input)?;
        self.items.push(child);
        let index = self.items.len() - 1;
        Ok(&mut self.items[index])
    }

    /// Find a descendant by name, depth-first. The first match wins.
    pub fn find_item(&self, name: &str) -> Option<&MenuItem> {
        for child in &self.items {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find_item(name) {
                return Some(found);
            }
        }
        None
    }

    /// Mutable variant of [`MenuItem::find_item`].
    pub fn find_item_mut(&mut self, name: &str) -> Option<&mut MenuItem> {
        for child in &mut self.items {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find_item_mut(name) {
                return Some(found);
            }
        }
        None
    }

    /// Remove the first descendant with this name, depth-first.
    ///
    /// Returns whether anything was removed. The removed item's subtree
    /// goes with it.
    pub fn remove_item(&mut self, name: &str) -> bool {
        for index in 0..self.items.len() {
            if self.items[index].name == name {
                self.items.remove(index);
                return true;
            }
            if self.items[index].remove_item(name) {
                return true;
            }
        }
        false
    }

    /// Number of nodes in this subtree, the receiver included.
    pub fn count(&self) -> usize {
        1 + self.items.iter().map(MenuItem::count).sum::<usize>()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn active_route(&self) -> Option<&ActiveRoute> {
        self.active_route.as_ref()
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Whether the link points outside the application.
    pub fn is_external(&self) -> bool {
        self.link.as_deref().is_some_and(is_external_link)
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<MenuItem> {
        &mut self.items
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Copy of this node without its children.
    pub(crate) fn shell(&self) -> MenuItem {
        MenuItem {
            name: self.name.clone(),
            text: self.text.clone(),
            link: self.link.clone(),
            active_route: self.active_route.clone(),
            items: Vec::new(),
            active: self.active,
            options: self.options.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(item: &MenuItem) -> Vec<&str> {
        item.items().iter().map(MenuItem::name).collect()
    }

    #[test]
    fn external_links_are_recognized() {
        assert!(is_external_link("https://example.com"));
        assert!(is_external_link("HTTP://EXAMPLE.COM"));
        assert!(is_external_link("mailto:team@example.com"));
        assert!(!is_external_link("/admin"));
        assert!(!is_external_link("admin"));
        assert!(!is_external_link("ht"));
    }

    #[test]
    fn add_item_chains_on_receiver() {
        let mut root = MenuItem::root("main").unwrap();
        root.add_item("a", NewMenuItem::new("A").with_link("/a"))
            .unwrap()
            .add_item("b", NewMenuItem::new("B").with_link("/b"))
            .unwrap();

        assert_eq!(names(&root), vec!["a", "b"]);
    }

    #[test]
    fn create_sub_menu_returns_child() {
        let mut root = MenuItem::root("main").unwrap();
        root.create_sub_menu("import", NewMenuItem::new("Import"))
            .unwrap()
            .add_item(
                "claim",
                NewMenuItem::new("Claim").with_link("/import/claim"),
            )
            .unwrap();

        assert_eq!(names(&root), vec!["import"]);
        let import = root.find_item("import").unwrap();
        assert_eq!(names(import), vec!["claim"]);
        assert_eq!(root.count(), 3);
    }

    #[test]
    fn text_defaults_to_name() {
        let item = MenuItem::build("reports", NewMenuItem::default()).unwrap();
        assert_eq!(item.text(), "reports");
    }

    #[test]
    fn relative_link_is_rejected() {
        let mut root = MenuItem::root("main").unwrap();
        let err = root
            .add_item("bad", NewMenuItem::new("Bad").with_link("admin/users"))
            .unwrap_err();
        assert!(matches!(err, MenuError::InvalidLink { ref link, .. } if link == "admin/users"));
        assert!(root.items().is_empty());
    }

    #[test]
    fn empty_link_is_rejected() {
        let err = MenuItem::build("bad", NewMenuItem::new("Bad").with_link("")).unwrap_err();
        assert!(matches!(err, MenuError::InvalidLink { .. }));
    }

    #[test]
    fn external_link_is_accepted() {
        let input = NewMenuItem::new("Docs").with_link("https://docs.rs");
        let item = MenuItem::build("docs", input).unwrap();
        assert!(item.is_external());
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(
            MenuItem::build("  ", NewMenuItem::default()),
            Err(MenuError::MissingName)
        ));
    }

    #[test]
    fn invalid_active_route_is_rejected() {
        let input = NewMenuItem::new("X").with_active_route("/x/(");
        let err = MenuItem::build("x", input).unwrap_err();
        assert!(matches!(err, MenuError::InvalidActiveRoute { .. }));
    }

    #[test]
    fn active_route_is_anchored_and_case_insensitive() {
        let route = ActiveRoute::new("/import/claim(/.*)?").unwrap();
        assert!(route.matches("/import/claim"));
        assert!(route.matches("/IMPORT/Claim/new"));
        assert!(!route.matches("/import/claims"));
        assert!(!route.matches("/x/import/claim"));
    }

    #[test]
    fn find_item_searches_depth_first() {
        let mut root = MenuItem::root("main").unwrap();
        root.create_sub_menu("a", NewMenuItem::new("A"))
            .unwrap()
            .add_item("dup", NewMenuItem::new("first"))
            .unwrap();
        root.add_item("dup", NewMenuItem::new("second")).unwrap();

        assert_eq!(root.find_item("dup").unwrap().text(), "first");
        assert!(root.find_item("missing").is_none());
    }

    #[test]
    fn remove_item_removes_nested_subtree() {
        let mut root = MenuItem::root("main").unwrap();
        root.create_sub_menu("a", NewMenuItem::new("A"))
            .unwrap()
            .create_sub_menu("a1", NewMenuItem::new("A1"))
            .unwrap()
            .add_item("a1x", NewMenuItem::new("A1x"))
            .unwrap();

        assert!(root.remove_item("a1"));
        assert!(root.find_item("a1x").is_none());
        assert!(root.find_item("a").is_some());
        assert!(!root.remove_item("a1"));
    }

    #[test]
    fn options_pass_through_serialization() {
        let item = MenuItem::build(
            "a",
            NewMenuItem::new("A")
                .with_link("/a")
                .with_option("icon", json!("fa-home")),
        )
        .unwrap();

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["options"]["icon"], json!("fa-home"));
        assert_eq!(value["link"], json!("/a"));
        assert_eq!(value["active"], json!(false));
    }
}
