//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Menu definition file, JSON or YAML (default: ./menus.yaml).
    pub menu_file: PathBuf,

    /// Separate route protection file. When None, protections come from
    /// the `routes` section of the menu file.
    pub routes_file: Option<PathBuf>,

    /// Menu rendered when none is named (default: main).
    pub default_menu: String,

    /// Permissions held by the simulated user (comma-separated).
    pub permissions: Vec<String>,

    /// Whether the simulated user is anonymous (default: false).
    pub anonymous: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let menu_file = env::var("WAYMARK_MENU_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./menus.yaml"));

        let routes_file = env::var("WAYMARK_ROUTES_FILE").ok().map(PathBuf::from);

        let default_menu = env::var("WAYMARK_DEFAULT_MENU").unwrap_or_else(|_| "main".to_string());

        let permissions = env::var("WAYMARK_PERMISSIONS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        let anonymous = env::var("WAYMARK_ANONYMOUS")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            .parse()
            .context("WAYMARK_ANONYMOUS must be true or false")?;

        Ok(Self {
            menu_file,
            routes_file,
            default_menu,
            permissions,
            anonymous,
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
