//! Where composite nodes persist their resume points.

use std::collections::{BTreeMap, HashMap};

use ck_core::AgentRecord;

/// Durable per-agent cursor slot, keyed by node id.
///
/// Production code passes the agent's [`AgentRecord`]; tests can use a
/// plain map.
pub trait CursorStore {
    /// Remove and return the cursor for `node`.
    fn take_cursor(&mut self, node: &str) -> Option<usize>;

    /// Store `index` as the cursor for `node`, replacing any previous one.
    fn put_cursor(&mut self, node: &str, index: usize);
}

impl CursorStore for AgentRecord {
    fn take_cursor(&mut self, node: &str) -> Option<usize> {
        AgentRecord::take_cursor(self, node)
    }

    fn put_cursor(&mut self, node: &str, index: usize) {
        AgentRecord::put_cursor(self, node, index);
    }
}

impl CursorStore for HashMap<String, usize> {
    fn take_cursor(&mut self, node: &str) -> Option<usize> {
        self.remove(node)
    }

    fn put_cursor(&mut self, node: &str, index: usize) {
        self.insert(node.to_owned(), index);
    }
}

impl CursorStore for BTreeMap<String, usize> {
    fn take_cursor(&mut self, node: &str) -> Option<usize> {
        self.remove(node)
    }

    fn put_cursor(&mut self, node: &str, index: usize) {
        self.insert(node.to_owned(), index);
    }
}

impl<S: CursorStore + ?Sized> CursorStore for &mut S {
    fn take_cursor(&mut self, node: &str) -> Option<usize> {
        (**self).take_cursor(node)
    }

    fn put_cursor(&mut self, node: &str, index: usize) {
        (**self).put_cursor(node, index);
    }
}
