#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Menu tree and active-path tests.
//!
//! Exercises the public registry, builder and active-marking API against
//! the shared claims menu fixture.

use waymark_kernel::menu::{active_set, set_active_recursively};
use waymark_kernel::{MenuError, MenuItem, MenuRegistry, NewMenuItem};
use waymark_test_utils::assert::{active_names, child_names};
use waymark_test_utils::menus::claims_menu;

#[test]
fn test_active_route_marks_path_to_root() {
    let mut menu = claims_menu().unwrap();
    set_active_recursively("/import/claim/new", &mut menu);

    assert_eq!(active_names(&menu), vec!["main", "import", "claim"]);
    assert!(!menu.find_item("damage").unwrap().is_active());
}

#[test]
fn test_exactly_one_branch_is_active() {
    let mut menu = claims_menu().unwrap();

    for (path, expected) in [
        ("/admin/users", vec!["main", "admin", "users"]),
        ("/admin", vec!["main", "admin"]),
        ("/reports/monthly", vec!["main", "reports", "monthly"]),
        ("https://docs.example.com", vec!["main", "docs"]),
        ("/nowhere", vec![]),
    ] {
        set_active_recursively(path, &mut menu);
        assert_eq!(active_names(&menu), expected, "path {path}");
    }
}

#[test]
fn test_active_marking_is_idempotent() {
    let mut once = claims_menu().unwrap();
    set_active_recursively("/import/damage", &mut once);

    let mut twice = once.clone();
    set_active_recursively("/import/damage", &mut twice);

    assert_eq!(once, twice);
}

#[test]
fn test_active_set_agrees_with_flags() {
    let mut menu = claims_menu().unwrap();
    let set = active_set("/import/claim/42", &menu);
    set_active_recursively("/import/claim/42", &mut menu);

    let mut from_flags = active_names(&menu);
    let mut from_set: Vec<String> = set.into_iter().collect();
    from_flags.sort();
    from_set.sort();
    assert_eq!(from_flags, from_set);
}

#[test]
fn test_registry_builds_menu_through_edit() {
    let registry = MenuRegistry::new();
    let menu = registry.create_menu("admin", "nav/admin.html").unwrap();

    let content = NewMenuItem::new("Content").with_link("/admin/content");
    let types = NewMenuItem::new("Types").with_link("/admin/content/types");
    let users = NewMenuItem::new("Users").with_link("/admin/users");

    menu.edit(|root| -> Result<(), MenuError> {
        root.create_sub_menu("content", content)?
            .add_item("types", types)?;
        root.add_item("users", users)?;
        Ok(())
    })
    .unwrap();

    let tree = registry.menu("admin").unwrap().snapshot();
    assert_eq!(child_names(&tree), vec!["content", "users"]);
    assert!(tree.find_item("types").is_some());
}

#[test]
fn test_invalid_link_fails_at_construction() {
    let registry = MenuRegistry::new();
    let menu = registry.create_menu("main", "nav.html").unwrap();

    let result = menu.edit(|root| {
        root.add_item("bad", NewMenuItem::new("Bad").with_link("admin"))
            .map(|_| ())
    });

    assert!(matches!(result, Err(MenuError::InvalidLink { .. })));
    assert_eq!(menu.read(MenuItem::count), 1);
}

#[test]
fn test_remove_item_then_find() {
    let mut menu = claims_menu().unwrap();
    assert!(menu.remove_item("admin"));
    assert!(menu.find_item("users").is_none());
    assert!(menu.find_item("audit").is_none());
    assert!(!menu.remove_item("admin"));
    assert_eq!(child_names(&menu), vec!["import", "reports", "docs"]);
}

#[test]
fn test_global_registry_is_shared() {
    let first = MenuRegistry::global();
    let second = MenuRegistry::global();
    first
        .create_menu("menu_test_global", "nav.html")
        .unwrap();

    assert!(second.menu("menu_test_global").is_some());
    assert!(second.remove_menu("menu_test_global"));
}
