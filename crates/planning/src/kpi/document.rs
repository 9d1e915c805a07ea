use std::collections::BTreeMap;

use bevy::log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PlanningError;

/// A typed result stored under one key of the KPI document.
///
/// Bump `VERSION` whenever the serialized shape changes; readers ignore
/// sections written with a different version.
pub trait KpiSection: Serialize + DeserializeOwned {
    const KEY: &'static str;
    const VERSION: u32 = 1;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiEntry {
    pub version: u32,
    /// Starts at 1 and increases by one on every merge of this key.
    pub revision: u64,
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KpiDocument {
    entries: BTreeMap<String, KpiEntry>,
}

impl KpiDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn entry(&self, key: &str) -> Option<&KpiEntry> {
        self.entries.get(key)
    }

    /// Current revision of a key, 0 if it was never written.
    pub fn revision(&self, key: &str) -> u64 {
        self.entries.get(key).map_or(0, |e| e.revision)
    }

    /// Replace the section stored under `S::KEY` and return its new revision.
    pub fn merge<S: KpiSection>(&mut self, section: &S) -> Result<u64, PlanningError> {
        let payload = serde_json::to_value(section)?;
        Ok(self.insert_raw(S::KEY, S::VERSION, payload))
    }

    /// Like [`merge`](Self::merge), but only if the stored revision still
    /// equals `expected_revision` (0 for a key that must not exist yet).
    pub fn merge_expecting<S: KpiSection>(
        &mut self,
        section: &S,
        expected_revision: u64,
    ) -> Result<u64, PlanningError> {
        let found = self.revision(S::KEY);
        if found != expected_revision {
            warn!(
                "rejecting KPI write to '{}': expected r{}, found r{}",
                S::KEY,
                expected_revision,
                found
            );
            return Err(PlanningError::StaleRevision {
                key: S::KEY.to_string(),
                expected: expected_revision,
                found,
            });
        }
        self.merge(section)
    }

    pub(crate) fn insert_raw(&mut self, key: &str, version: u32, payload: Value) -> u64 {
        let revision = self.revision(key) + 1;
        self.entries.insert(
            key.to_string(),
            KpiEntry {
                version,
                revision,
                payload,
            },
        );
        revision
    }

    pub(crate) fn insert_entry(&mut self, key: String, entry: KpiEntry) {
        self.entries.insert(key, entry);
    }

    pub(crate) fn iter_entries(&self) -> impl Iterator<Item = (&String, &KpiEntry)> {
        self.entries.iter()
    }

    /// Typed read of a section. Missing, version-mismatched and undecodable
    /// sections all read as `None`; the latter two are logged.
    pub fn section<S: KpiSection>(&self) -> Option<S> {
        let entry = self.entries.get(S::KEY)?;
        if entry.version != S::VERSION {
            warn!(
                "ignoring KPI section '{}' with version {} (expected {})",
                S::KEY,
                entry.version,
                S::VERSION
            );
            return None;
        }
        match serde_json::from_value(entry.payload.clone()) {
            Ok(section) => Some(section),
            Err(e) => {
                warn!("failed to decode KPI section '{}': {}", S::KEY, e);
                None
            }
        }
    }

    /// Nested lookup: the first segment names the section, the rest walk its
    /// payload. Numeric segments index into arrays.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (key, rest) = path.split_first()?;
        let mut value = &self.entries.get(*key)?.payload;
        for segment in rest {
            value = match value {
                Value::Object(map) => map.get(*segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(value)
    }

    /// The document as plain nested JSON, `{ key: payload }`, without
    /// version bookkeeping.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, e)| (k.clone(), e.payload.clone()))
                .collect(),
        )
    }
}
