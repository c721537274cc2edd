//! The durable store: the only state that survives a cycle boundary.
//!
//! # Layout
//!
//! ```text
//! Memory
//! ├── version: u64                      bumped on every flush
//! └── agents: BTreeMap<AgentId, AgentRecord>
//!         ├── cursors: node id → child index   (behavior-tree resume points)
//!         └── fields:  key → value             (task fields owned by leaves)
//! ```
//!
//! `Memory` is passed explicitly into every cycle rather than living in a
//! global.  How it is encoded for the host is left to the caller; with the
//! `serde` feature enabled it derives `Serialize`/`Deserialize`.
//!
//! `BTreeMap` keeps iteration (and therefore any serialized form)
//! deterministic.

use std::collections::BTreeMap;

use crate::AgentId;

// ── AgentRecord ───────────────────────────────────────────────────────────────

/// Durable per-agent record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentRecord {
    /// Behavior-tree cursors keyed by node id.  An entry exists only while
    /// its node is mid-execution.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub cursors: BTreeMap<String, usize>,

    /// Free-form task fields written by leaf bodies (current target, …).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub fields: BTreeMap<String, String>,
}

impl AgentRecord {
    /// Remove and return the cursor stored for `node`.
    #[inline]
    pub fn take_cursor(&mut self, node: &str) -> Option<usize> {
        self.cursors.remove(node)
    }

    #[inline]
    pub fn put_cursor(&mut self, node: &str, index: usize) {
        self.cursors.insert(node.to_owned(), index);
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn set_field(&mut self, key: &str, value: impl Into<String>) {
        self.fields.insert(key.to_owned(), value.into());
    }

    pub fn remove_field(&mut self, key: &str) -> Option<String> {
        self.fields.remove(key)
    }

    /// `true` if the record carries no cursors and no fields.
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty() && self.fields.is_empty()
    }
}

// ── Memory ────────────────────────────────────────────────────────────────────

/// Versioned durable key-value store, keyed by agent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Memory {
    version: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    agents:  BTreeMap<AgentId, AgentRecord>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of flushes this store has been through.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Mark the end of a cycle.  Returns the new version.
    ///
    /// Records left empty by the cycle are dropped so agents that finished
    /// all their work do not accumulate blank entries.
    pub fn flush(&mut self) -> u64 {
        self.agents.retain(|_, record| !record.is_empty());
        self.version += 1;
        self.version
    }

    /// Read-only access to an agent's record.
    pub fn agent(&self, agent: &AgentId) -> Option<&AgentRecord> {
        self.agents.get(agent)
    }

    /// Mutable access to an agent's record, creating an empty one if absent.
    pub fn agent_mut(&mut self, agent: &AgentId) -> &mut AgentRecord {
        self.agents.entry(agent.clone()).or_default()
    }

    pub fn remove_agent(&mut self, agent: &AgentId) -> Option<AgentRecord> {
        self.agents.remove(agent)
    }

    /// Keep only the records for which `keep` returns `true`.
    ///
    /// Managers call this to garbage-collect records of agents that no
    /// longer exist.  Returns the number of records removed.
    pub fn retain_agents<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&AgentId, &AgentRecord) -> bool,
    {
        let before = self.agents.len();
        self.agents.retain(|id, record| keep(id, record));
        before - self.agents.len()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Iterator over all records in ascending agent order.
    pub fn agents(&self) -> impl Iterator<Item = (&AgentId, &AgentRecord)> + '_ {
        self.agents.iter()
    }
}
