//! Declarative menu files.
//!
//! A menu file (JSON or YAML) declares any number of named menus and,
//! optionally, the route protections that apply to them:
//!
//! ```yaml
//! menus:
//!   main:
//!     template: nav/main.html
//!     items:
//!       - name: import
//!         text: Import
//!         items:
//!           - name: claim
//!             text: Claims
//!             link: /import/claim
//!             active_route: /import/claim(/.*)?
//! routes:
//!   /import/claim: ["CLAIMS"]
//! ```
//!
//! Items go through the same validating builder as programmatic menus, so
//! a bad link fails the whole file before anything is registered.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use super::item::{MenuItem, NewMenuItem};
use super::registry::{Menu, MenuRegistry};
use crate::error::{MenuError, MenuResult};
use crate::protection::RouteProtections;

/// Parsed menu file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuFile {
    #[serde(default)]
    pub menus: BTreeMap<String, MenuDefinition>,
    #[serde(default)]
    pub routes: RouteProtections,
}

/// One declared menu.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuDefinition {
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub items: Vec<ItemDefinition>,
}

/// One declared item and its children.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemDefinition {
    pub name: String,
    #[serde(flatten)]
    pub item: NewMenuItem,
    #[serde(default)]
    pub items: Vec<ItemDefinition>,
}

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> MenuResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(MenuError::Definition(format!(
                "unsupported menu file extension: {}",
                path.display()
            ))),
        }
    }
}

impl MenuFile {
    /// Parse file contents.
    pub fn parse(contents: &str, format: Format) -> MenuResult<Self> {
        match format {
            Format::Json => {
                serde_json::from_str(contents).map_err(|e| MenuError::Definition(e.to_string()))
            }
            Format::Yaml => {
                serde_yml::from_str(contents).map_err(|e| MenuError::Definition(e.to_string()))
            }
        }
    }

    /// Read and parse a file, picking the format from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let format = Format::from_path(path)?;
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read menu file {}", path.display()))?;
        let file = Self::parse(&contents, format)
            .with_context(|| format!("failed to parse menu file {}", path.display()))?;
        Ok(file)
    }

    /// Build every declared menu and register them.
    ///
    /// All trees are built and all names checked before the first menu is
    /// registered.
    pub fn register(&self, registry: &MenuRegistry) -> MenuResult<Vec<Arc<Menu>>> {
        let mut built = Vec::with_capacity(self.menus.len());
        for (name, definition) in &self.menus {
            if registry.menu(name).is_some() {
                return Err(MenuError::DuplicateMenu(name.clone()));
            }
            built.push((name, definition, definition.build(name)?));
        }

        let mut menus = Vec::with_capacity(built.len());
        for (name, definition, tree) in built {
            let menu = registry.create_menu(name, definition.template.clone())?;
            menu.edit(|root| *root = tree);
            menus.push(menu);
        }

        info!(menus = menus.len(), "menu file registered");
        Ok(menus)
    }
}

impl MenuDefinition {
    /// Build the declared tree without registering it.
    pub fn build(&self, name: &str) -> MenuResult<MenuItem> {
        let mut root = MenuItem::root(name)?;
        attach(&mut root, &self.items)?;
        Ok(root)
    }
}

fn attach(parent: &mut MenuItem, definitions: &[ItemDefinition]) -> MenuResult<()> {
    for definition in definitions {
        let child = parent.create_sub_menu(&definition.name, definition.item.clone())?;
        attach(child, &definition.items)?;
    }
    Ok(())
}
