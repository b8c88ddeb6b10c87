//! Request context - the request id shared by every line of a unit of work

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::RequestId;

/// Ambient data describing a unit of work (request metadata, process
/// environment, arguments).
///
/// Keys are kept sorted so the serialized form is canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvSnapshot(BTreeMap<String, String>);

impl EnvSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment
    pub fn from_process_env() -> Self {
        std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    /// Add or replace one entry
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder form of [`EnvSnapshot::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Fingerprint a snapshot: the first 6 hex chars of the MD5 of its
/// canonical JSON form. Pure.
pub fn compute_request_id(snapshot: &EnvSnapshot) -> RequestId {
    // A BTreeMap<String, String> always serializes
    let canonical = serde_json::to_vec(snapshot).unwrap_or_default();
    let digest = md5::compute(&canonical);
    RequestId::from_digest(&format!("{:x}", digest))
}

/// Per unit-of-work context, captured once at the start of the unit
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    started_at: DateTime<Utc>,
}

impl RequestContext {
    /// Capture the context from the ambient snapshot
    pub fn capture(snapshot: &EnvSnapshot) -> Self {
        Self {
            request_id: compute_request_id(snapshot),
            started_at: Utc::now(),
        }
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
