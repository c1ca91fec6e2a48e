//! Multi-step wizard flow.
//!
//! Steps are visited in order with `advance` and `back`. A user may jump
//! back to any step already reached, or forward only to the next unreached
//! step.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

/// Wizard errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("a wizard needs at least one step")]
    NoSteps,

    #[error("step '{0}' is declared more than once")]
    DuplicateStep(String),

    #[error("unknown step '{0}'")]
    UnknownStep(String),

    #[error("step '{0}' cannot be reached yet")]
    Unreachable(String),
}

/// Position within an ordered list of named steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wizard {
    steps: Vec<String>,
    current: usize,
    /// Highest step index reached so far.
    furthest: usize,
}

impl Wizard {
    /// Start a wizard at its first step.
    pub fn new<I, S>(steps: I) -> Result<Self, WizardError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let steps: Vec<String> = steps.into_iter().map(Into::into).collect();
        if steps.is_empty() {
            return Err(WizardError::NoSteps);
        }

        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.as_str()) {
                return Err(WizardError::DuplicateStep(step.clone()));
            }
        }

        Ok(Self {
            steps,
            current: 0,
            furthest: 0,
        })
    }

    /// Name of the current step.
    pub fn current(&self) -> &str {
        &self.steps[self.current]
    }

    /// Zero-based index of the current step.
    pub fn index(&self) -> usize {
        self.current
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.steps.len()
    }

    /// Fraction of steps completed, counting the current one.
    pub fn progress(&self) -> f64 {
        (self.current + 1) as f64 / self.steps.len() as f64
    }

    /// Whether a step has been reached.
    pub fn visited(&self, step: &str) -> bool {
        self.position(step).is_some_and(|i| i <= self.furthest)
    }

    /// Advance one step. Returns the new step, or None at the last step.
    pub fn advance(&mut self) -> Option<&str> {
        if self.is_last() {
            return None;
        }
        self.current += 1;
        self.furthest = self.furthest.max(self.current);
        Some(self.current())
    }

    /// Go back one step. Returns the new step, or None at the first step.
    pub fn back(&mut self) -> Option<&str> {
        if self.is_first() {
            return None;
        }
        self.current -= 1;
        Some(self.current())
    }

    /// Jump to a named step.
    pub fn go_to(&mut self, step: &str) -> Result<(), WizardError> {
        let index = self
            .position(step)
            .ok_or_else(|| WizardError::UnknownStep(step.to_string()))?;
        if index > self.furthest + 1 {
            return Err(WizardError::Unreachable(step.to_string()));
        }

        self.current = index;
        self.furthest = self.furthest.max(index);
        Ok(())
    }

    /// Back to the first step, forgetting progress.
    pub fn reset(&mut self) {
        self.current = 0;
        self.furthest = 0;
    }

    fn position(&self, step: &str) -> Option<usize> {
        self.steps.iter().position(|s| s == step)
    }
}
