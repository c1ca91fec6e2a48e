//! Menu configuration error types.

use thiserror::Error;

/// Errors raised while building or registering menus.
///
/// These are configuration errors: they surface at construction time and
/// are never produced by lookups or permission filtering.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("menu '{0}' is already registered")]
    DuplicateMenu(String),

    #[error("menu item name must not be empty")]
    MissingName,

    #[error("menu item '{item}' has invalid link '{link}': internal links must start with '/'")]
    InvalidLink { item: String, link: String },

    #[error("menu item '{item}' has invalid active route '{pattern}'")]
    InvalidActiveRoute {
        item: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("menu file error: {0}")]
    Definition(String),
}

/// Result type alias using MenuError.
pub type MenuResult<T> = Result<T, MenuError>;
