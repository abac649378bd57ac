//! Resolved flag assignments.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::core::flag::{FlagId, FlagValue};

/// Mapping from flag identifier to its resolved value.
///
/// Unset flags (e.g. an empty install prefix) are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlagSet {
    values: BTreeMap<FlagId, FlagValue>,
}

impl FlagSet {
    pub fn new() -> Self {
        FlagSet::default()
    }

    pub fn insert(&mut self, id: FlagId, value: FlagValue) {
        self.values.insert(id, value);
    }

    pub fn get(&self, id: FlagId) -> Option<&FlagValue> {
        self.values.get(&id)
    }

    /// Boolean value of a flag; unset or non-boolean reads as false.
    pub fn get_bool(&self, id: FlagId) -> bool {
        self.values
            .get(&id)
            .and_then(FlagValue::as_bool)
            .unwrap_or(false)
    }

    /// Path value of a flag, ignoring empty paths.
    pub fn get_path(&self, id: FlagId) -> Option<&Path> {
        self.values
            .get(&id)
            .and_then(FlagValue::as_path)
            .filter(|p| !p.as_os_str().is_empty())
    }

    pub fn get_text(&self, id: FlagId) -> Option<&str> {
        self.values.get(&id).and_then(FlagValue::as_text)
    }

    pub fn contains(&self, id: FlagId) -> bool {
        self.values.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FlagId, &FlagValue)> {
        self.values.iter().map(|(id, v)| (*id, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The entries of `self` that differ from `base`.
    pub fn diff(&self, base: &FlagSet) -> FlagSet {
        let values = self
            .values
            .iter()
            .filter(|(id, value)| base.get(**id) != Some(*value))
            .map(|(id, value)| (*id, value.clone()))
            .collect();
        FlagSet { values }
    }
}
