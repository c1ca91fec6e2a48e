//! Navigation menus.
//!
//! Menus are named trees of items held in a [`MenuRegistry`] and provide:
//! - Navigation structure for rendering
//! - Active-path marking against the current URL
//! - Permission-filtered copies per user

mod active;
mod binding;
mod definition;
mod filter;
mod item;
mod registry;

pub use active::{active_set, set_active_recursively};
pub use binding::MenuBinding;
pub use definition::{Format, ItemDefinition, MenuDefinition, MenuFile};
pub use filter::MenuPermissionService;
pub use item::{ActiveRoute, EXTERNAL_SCHEMES, MenuItem, NewMenuItem, is_external_link};
pub use registry::{Menu, MenuRegistry};
