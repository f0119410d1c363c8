//! Persona profile types.
//!
//! A persona is defined by two key/value profile tables loaded from CSV:
//! `personality` (who the character is) and `behavior` (how it talks).
//! The tables are free-form -- the prompt builder reads well-known keys but
//! unknown keys still flow into the narrative-generation prompt.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An ordered key/value profile table.
///
/// Backed by a `BTreeMap` so iteration order (and therefore prompt output)
/// is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileTable(BTreeMap<String, String>);

impl ProfileTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair, trimming both sides.
    ///
    /// Blank keys or values are ignored (mirrors how the data files treat
    /// half-filled rows).
    pub fn insert(&mut self, key: &str, value: &str) {
        let key = key.trim();
        let value = value.trim();
        if !key.is_empty() && !value.is_empty() {
            self.0.insert(key.to_string(), value.to_string());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value for `key`, or an empty string when absent.
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for ProfileTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut table = ProfileTable::new();
        for (k, v) in iter {
            table.insert(&k, &v);
        }
        table
    }
}

/// The complete persona: display names plus the two profile tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Full institutional name (e.g. "Northgate College of Music").
    pub name: String,
    /// Short friendly name used in greetings and apologies.
    pub nickname: String,
    pub personality: ProfileTable,
    pub behavior: ProfileTable,
}
