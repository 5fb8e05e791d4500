use std::collections::HashMap;
use std::collections::hash_map;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::values::Value;

/// Errors raised while building a change set from transport input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChangeSetError {
    /// Change sets can only be read from a JSON object
    #[error("expected a JSON object of changes, found {found}")]
    NotAnObject { found: &'static str },
}

/// Field tag to new value. Iteration order carries no meaning.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    changes: HashMap<String, Value>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.changes.insert(tag.into(), value.into())
    }

    pub fn with(mut self, tag: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(tag, value);
        self
    }

    pub fn get(&self, tag: &str) -> Option<&Value> {
        self.changes.get(tag)
    }

    pub fn remove(&mut self, tag: &str) -> Option<Value> {
        self.changes.remove(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.changes.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.changes.iter()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ChangeSet::new();
        set.extend(iter);
        set
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for ChangeSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (tag, value) in iter {
            self.insert(tag, value);
        }
    }
}

impl IntoIterator for ChangeSet {
    type Item = (String, Value);
    type IntoIter = hash_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
