//! Keyboard shortcut registry.
//!
//! Shortcuts are declared as strings such as `ctrl+shift+k` and bound to
//! action names in one of two scopes. Page bindings shadow global ones and
//! are cleared whenever the page changes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Errors from parsing a key combination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortcutError {
    #[error("shortcut is empty")]
    Empty,

    #[error("shortcut '{0}' has an empty segment")]
    EmptySegment(String),

    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),

    #[error("modifier '{0}' appears more than once")]
    DuplicateModifier(String),

    #[error("shortcut '{0}' has no key")]
    MissingKey(String),
}

/// Modifier keys held with a combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    fn flag(&mut self, name: &str) -> Option<&mut bool> {
        match name {
            "ctrl" | "control" => Some(&mut self.ctrl),
            "alt" | "option" => Some(&mut self.alt),
            "shift" => Some(&mut self.shift),
            "meta" | "cmd" | "command" | "super" => Some(&mut self.meta),
            _ => None,
        }
    }
}

/// A key plus modifiers, normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    modifiers: Modifiers,
    key: String,
}

impl KeyCombo {
    /// Parse `mod+mod+key`. Modifiers may come in any order; `plus` names
    /// the `+` key.
    pub fn parse(spec: &str) -> Result<Self, ShortcutError> {
        let normalized = spec.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ShortcutError::Empty);
        }

        let segments: Vec<&str> = normalized.split('+').map(str::trim).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ShortcutError::EmptySegment(spec.to_string()));
        }

        let (key, modifier_names) = match segments.split_last() {
            Some((key, rest)) => (*key, rest),
            None => return Err(ShortcutError::Empty),
        };

        let mut modifiers = Modifiers::default();
        if modifiers.flag(key).is_some() {
            return Err(ShortcutError::MissingKey(spec.to_string()));
        }

        for name in modifier_names {
            let Some(flag) = modifiers.flag(name) else {
                return Err(ShortcutError::UnknownModifier((*name).to_string()));
            };
            if *flag {
                return Err(ShortcutError::DuplicateModifier((*name).to_string()));
            }
            *flag = true;
        }

        let key = if key == "plus" { "+" } else { key };
        Ok(Self {
            modifiers,
            key: key.to_string(),
        })
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl FromStr for KeyCombo {
    type Err = ShortcutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (held, name) in [
            (m.ctrl, "ctrl"),
            (m.alt, "alt"),
            (m.shift, "shift"),
            (m.meta, "meta"),
        ] {
            if held {
                write!(f, "{name}+")?;
            }
        }
        if self.key == "+" {
            f.write_str("plus")
        } else {
            f.write_str(&self.key)
        }
    }
}

/// Where a binding lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Active on every page.
    Global,
    /// Active until the page changes.
    Page,
}

/// A bound shortcut, as listed for a help overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortcutBinding {
    pub combo: String,
    pub action: String,
    pub scope: Scope,
}

/// Shortcut bindings in global and page scope.
#[derive(Debug, Default)]
pub struct ShortcutRegistry {
    global: HashMap<KeyCombo, String>,
    page: HashMap<KeyCombo, String>,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a combination to an action. Returns the action it replaced in
    /// the same scope, if any.
    pub fn bind(
        &mut self,
        scope: Scope,
        combo: &str,
        action: impl Into<String>,
    ) -> Result<Option<String>, ShortcutError> {
        let combo = KeyCombo::parse(combo)?;
        let action = action.into();
        debug!(combo = %combo, action = %action, ?scope, "shortcut bound");
        Ok(self.scope_mut(scope).insert(combo, action))
    }

    /// Remove a binding. Returns whether one existed.
    pub fn unbind(&mut self, scope: Scope, combo: &KeyCombo) -> bool {
        self.scope_mut(scope).remove(combo).is_some()
    }

    /// Action for a pressed combination. Page bindings win.
    pub fn resolve(&self, combo: &KeyCombo) -> Option<&str> {
        self.page
            .get(combo)
            .or_else(|| self.global.get(combo))
            .map(String::as_str)
    }

    /// Drop all page bindings (call on navigation).
    pub fn clear_page(&mut self) {
        self.page.clear();
    }

    /// Every binding, page scope first, each scope sorted by combination.
    pub fn bindings(&self) -> Vec<ShortcutBinding> {
        let mut listed = Vec::with_capacity(self.page.len() + self.global.len());
        for (scope, map) in [(Scope::Page, &self.page), (Scope::Global, &self.global)] {
            let mut entries: Vec<ShortcutBinding> = map
                .iter()
                .map(|(combo, action)| ShortcutBinding {
                    combo: combo.to_string(),
                    action: action.clone(),
                    scope,
                })
                .collect();
            entries.sort_by(|a, b| a.combo.cmp(&b.combo));
            listed.extend(entries);
        }
        listed
    }

    fn scope_mut(&mut self, scope: Scope) -> &mut HashMap<KeyCombo, String> {
        match scope {
            Scope::Global => &mut self.global,
            Scope::Page => &mut self.page,
        }
    }
}
