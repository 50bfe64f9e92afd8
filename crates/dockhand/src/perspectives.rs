//! Named layouts the user can switch between.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::RestoreError;
use crate::persistence::LayoutDocument;
use crate::system::DockingSystem;

/// Saved layouts keyed by name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveStore {
    perspectives: IndexMap<String, LayoutDocument>,
}

impl PerspectiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the system's current layout under `name`, replacing any
    /// perspective with that name.
    pub fn save(&mut self, name: impl Into<String>, system: &DockingSystem, user_version: u32) {
        let name = name.into();
        tracing::debug!("Saved perspective '{}'", name);
        self.perspectives.insert(name, system.save_state(user_version));
    }

    /// Apply a stored perspective to `system`.
    pub fn open(&self, name: &str, system: &mut DockingSystem, user_version: u32) -> Result<(), RestoreError> {
        let document = self
            .perspectives
            .get(name)
            .ok_or_else(|| RestoreError::UnknownPerspective(name.to_string()))?;
        system.restore_state(document, user_version)?;
        tracing::info!("Opened perspective '{}'", name);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<LayoutDocument> {
        self.perspectives.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&LayoutDocument> {
        self.perspectives.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.perspectives.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.perspectives.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.perspectives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perspectives.is_empty()
    }

    pub fn to_json(&self) -> Result<String, RestoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RestoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), RestoreError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RestoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
