#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Menu file loading tests.

use std::io::Write;
use std::sync::Arc;

use waymark_kernel::menu::MenuFile;
use waymark_kernel::{
    Access, Authorizer, MenuBinding, MenuPermissionService, MenuRegistry, RouteGate,
    StaticAuthorizer,
};
use waymark_test_utils::assert::{active_names, has_exactly};

const MENUS: &str = r#"
menus:
  main:
    template: nav/main.html
    items:
      - name: home
        text: Home
        link: /
      - name: import
        text: Import
        items:
          - name: claim
            text: Claims
            link: /import/claim
            active_route: /import/claim(/.*)?
          - name: damage
            text: Damage
            link: /import/damage
  footer:
    template: nav/footer.html
    items:
      - name: about
        link: /about
routes:
  /import/claim: ["CLAIMS"]
  /import/damage: true
"#;

fn write_temp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_loaded_menu_renders_for_user() {
    let temp = write_temp(MENUS, ".yaml");
    let file = MenuFile::load(temp.path()).unwrap();

    let registry = MenuRegistry::new();
    file.register(&registry).unwrap();
    assert_eq!(registry.names(), vec!["footer", "main"]);

    let user: Arc<dyn Authorizer> = Arc::new(StaticAuthorizer::authenticated(["CLAIMS"]));
    let routes = Arc::new(file.routes.clone());
    let service = MenuPermissionService::new(routes.clone(), Some(Arc::clone(&user)));
    let binding = MenuBinding::new(registry.menu("main").unwrap(), service);

    binding.route_changed("/import/claim/17").await;
    let view = binding.current();
    has_exactly(&view, &["main", "home", "import", "claim", "damage"]);
    assert_eq!(active_names(&view), vec!["main", "import", "claim"]);

    let gate = RouteGate::new(routes, Some(user));
    assert_eq!(gate.check("/import/claim").await, Access::Granted);
}

#[tokio::test]
async fn test_anonymous_user_loses_protected_items() {
    let temp = write_temp(MENUS, ".yml");
    let file = MenuFile::load(temp.path()).unwrap();

    let registry = MenuRegistry::new();
    file.register(&registry).unwrap();

    let user: Arc<dyn Authorizer> = Arc::new(StaticAuthorizer::anonymous());
    let service = MenuPermissionService::new(Arc::new(file.routes.clone()), Some(user));
    let view = service
        .filter(&registry.menu("main").unwrap().snapshot())
        .await;

    has_exactly(&view, &["main", "home", "import"]);
}

#[test]
fn test_json_file_loads() {
    let temp = write_temp(
        r#"{"menus": {"main": {"items": [{"name": "home", "link": "/"}]}}}"#,
        ".json",
    );
    let file = MenuFile::load(temp.path()).unwrap();
    let tree = file.menus["main"].build("main").unwrap();
    assert_eq!(tree.find_item("home").unwrap().text(), "home");
}

#[test]
fn test_load_errors_carry_path() {
    let temp = write_temp("menus: [", ".yaml");
    let err = MenuFile::load(temp.path()).unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse menu file"));

    let missing = MenuFile::load(std::path::Path::new("/nonexistent/menus.yaml")).unwrap_err();
    assert!(format!("{missing:#}").contains("failed to read menu file"));
}
