//! Shell variables referenced as `${NAME}` on the command line.

use std::env as stdenv;

use crate::error::ShellError;

/// Ordered name/value store backing `set`, `unset` and `${NAME}` substitution.
///
/// Entries keep insertion order and a name appears at most once. An optional capacity mirrors
/// the fixed-size table of classic shells; writes past it fail instead of being dropped.
#[derive(Debug, Clone, Default)]
pub struct VarStore {
    entries: Vec<(String, String)>,
    capacity: Option<usize>,
}

impl VarStore {
    /// An empty store with no capacity limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store that accepts at most `limit` distinct names.
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: Some(limit),
        }
    }

    /// Seed a store from the process environment. Only `PATH` is imported.
    pub fn from_process_env(capacity: Option<usize>) -> Self {
        let mut store = Self {
            entries: Vec::new(),
            capacity,
        };
        if let Ok(path) = stdenv::var("PATH") {
            // A store cannot be full before its first entry unless the limit is zero.
            if let Err(err) = store.set("PATH", path) {
                log::warn!("not importing PATH: {err}");
            }
        }
        store
    }

    /// Set `name` to `value`, replacing an existing entry in place.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ShellError> {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
            return Ok(());
        }
        if let Some(limit) = self.capacity {
            if self.entries.len() >= limit {
                return Err(ShellError::CapacityExceeded { limit });
            }
        }
        self.entries.push((name, value));
        Ok(())
    }

    /// Remove `name`, keeping the remaining entries in order.
    pub fn unset(&mut self, name: &str) -> Result<(), ShellError> {
        match self.entries.iter().position(|(n, _)| n == name) {
            Some(idx) => {
                self.entries.remove(idx);
                Ok(())
            }
            None => Err(ShellError::VariableNotFound(name.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
