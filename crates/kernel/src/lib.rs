//! Waymark Kernel Library
//!
//! Navigation building blocks for web front ends: named menu trees with
//! permission filtering and active-path marking, route gating, keyboard
//! shortcuts, sortable tables and wizard flows.
//!
//! The `waymark` binary renders and checks menus from the command line.

pub mod config;
pub mod error;
pub mod events;
pub mod gate;
pub mod menu;
pub mod permissions;
pub mod protection;
pub mod shortcuts;
pub mod table;
pub mod wizard;

pub use config::Config;
pub use error::{MenuError, MenuResult};
pub use events::PermissionEvents;
pub use gate::{Access, RouteGate};
pub use menu::{Menu, MenuBinding, MenuItem, MenuPermissionService, MenuRegistry, NewMenuItem};
pub use permissions::{Authorizer, CachingAuthorizer, StaticAuthorizer};
pub use protection::{Protection, RouteProtectionLookup, RouteProtections};
