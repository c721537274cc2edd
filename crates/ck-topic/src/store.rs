//! `TopicStore`: named priority queues with per-request expiry.
//!
//! # Why this exists
//!
//! Managers know *what* needs doing (a source wants harvesting, a structure
//! needs energy) but not *who* should do it; agents know what they can do
//! but not where the work is.  Topics decouple the two: producers publish
//! requests with a priority and a lifetime, consumers pull the most urgent
//! live one (or pick their own with a chooser).
//!
//! # Performance note
//!
//! Each topic is a `Vec` kept sorted ascending by priority.  Inserts are
//! O(log n) to find the slot plus O(n) to shift, pops from the high end are
//! O(1).  Topics hold tens of entries, not thousands, so the flat vector
//! beats a heap on constant factors and keeps peek/choose trivial.

use std::collections::BTreeMap;

use ck_core::{Cycle, TopicId};
use tracing::{debug, trace, warn};

use crate::{Request, TopicError, TopicResult};

#[cfg(feature = "fx-hash")]
type TopicMap<T> = rustc_hash::FxHashMap<TopicId, Vec<Request<T>>>;
#[cfg(not(feature = "fx-hash"))]
type TopicMap<T> = std::collections::HashMap<TopicId, Vec<Request<T>>>;

/// A set of named priority queues.
///
/// The store does not read a clock of its own: the kernel calls
/// [`set_cycle`](Self::set_cycle) at the top of every cycle and all expiry
/// arithmetic uses that value.
pub struct TopicStore<T> {
    topics:      TopicMap<T>,
    now:         Cycle,
    default_ttl: u64,
}

impl<T> TopicStore<T> {
    /// An empty store whose requests live `default_ttl` cycles unless told
    /// otherwise.
    pub fn new(default_ttl: u64) -> Self {
        Self {
            topics: TopicMap::default(),
            now: Cycle::ZERO,
            default_ttl,
        }
    }

    /// Adopt `now` as the current cycle.
    pub fn set_cycle(&mut self, now: Cycle) {
        self.now = now;
    }

    pub fn now(&self) -> Cycle {
        self.now
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    // ── Producers ─────────────────────────────────────────────────────────

    /// Publish a request that lives for the default ttl.
    pub fn add_request(
        &mut self,
        topic:    impl Into<TopicId>,
        priority: f64,
        details:  T,
    ) -> TopicResult<()> {
        let ttl = self.default_ttl;
        self.add_request_with_ttl(topic, priority, details, ttl)
    }

    /// Publish a request that may be consumed up to and including cycle
    /// `now + ttl`.  A ttl of 0 makes the request valid for this cycle only.
    pub fn add_request_with_ttl(
        &mut self,
        topic:    impl Into<TopicId>,
        priority: f64,
        details:  T,
        ttl:      u64,
    ) -> TopicResult<()> {
        let topic = topic.into();
        if priority.is_nan() {
            return Err(TopicError::InvalidPriority { topic });
        }
        trace!(%topic, priority, ttl, "add request");

        let request = Request {
            priority,
            details,
            created: self.now,
            expiry:  self.now + ttl,
        };
        let queue = self.topics.entry(topic).or_default();
        // Insert *before* existing equal priorities: the high end is popped
        // first, so older requests of the same priority come out first.
        let idx = queue.partition_point(|r| r.priority < priority);
        queue.insert(idx, request);
        Ok(())
    }

    // ── Consumers ─────────────────────────────────────────────────────────

    /// Remove and return the most urgent live request on `topic`.
    ///
    /// Expired entries met on the way are discarded.  Returns `None` when
    /// the topic holds no live work, which is a normal outcome.
    pub fn get_next_request(&mut self, topic: &str) -> Option<Request<T>> {
        let now = self.now;
        let queue = self.topics.get_mut(topic)?;
        let mut found = None;
        while let Some(request) = queue.pop() {
            if request.is_live(now) {
                found = Some(request);
                break;
            }
            trace!(topic, expiry = %request.expiry, "discard expired request");
        }
        if queue.is_empty() {
            self.topics.remove(topic);
        }
        found
    }

    /// The request [`get_next_request`](Self::get_next_request) would look at
    /// first, without removing it.
    ///
    /// Expired entries are **not** skipped: the returned request may be one
    /// that `get_next_request` would discard.  Check
    /// [`Request::is_live`] when that matters.
    pub fn peek_next_request(&self, topic: &str) -> Option<&Request<T>> {
        self.topics.get(topic)?.last()
    }

    /// Let the caller pick which request to take.
    ///
    /// Expired entries are purged from the topic first; `chooser` then sees
    /// the live requests in ascending priority order and returns the index
    /// of the one it wants.  Exactly that entry is removed and returned.
    /// An out-of-range index is treated as "none chosen".
    pub fn get_message_of_my_choice<F>(&mut self, topic: &str, chooser: F) -> Option<Request<T>>
    where
        F: FnOnce(&[Request<T>]) -> Option<usize>,
    {
        let now = self.now;
        let queue = self.topics.get_mut(topic)?;
        queue.retain(|r| r.is_live(now));

        let chosen = match chooser(queue.as_slice()) {
            Some(idx) if idx < queue.len() => Some(queue.remove(idx)),
            Some(idx) => {
                warn!(topic, idx, len = queue.len(), "chooser returned out-of-range index");
                None
            }
            None => None,
        };
        if queue.is_empty() {
            self.topics.remove(topic);
        }
        chosen
    }

    // ── Introspection ─────────────────────────────────────────────────────

    /// Number of entries on `topic`, including expired entries that have
    /// not been swept yet.
    pub fn get_length(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Vec::len)
    }

    /// Entry count per non-empty topic, in topic-name order.
    pub fn get_counts(&self) -> BTreeMap<TopicId, usize> {
        self.topics
            .iter()
            .map(|(topic, queue)| (topic.clone(), queue.len()))
            .collect()
    }

    /// Live requests on `topic` in retrieval order (most urgent first).
    pub fn topic(&self, topic: &str) -> impl Iterator<Item = &Request<T>> + '_ {
        let now = self.now;
        self.topics
            .get(topic)
            .into_iter()
            .flat_map(|queue| queue.iter().rev())
            .filter(move |r| r.is_live(now))
    }

    /// Total entries across all topics.
    pub fn len(&self) -> usize {
        self.topics.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    // ── Maintenance ───────────────────────────────────────────────────────

    /// Drop every entry on `topic`.  Returns the number removed.
    pub fn clear(&mut self, topic: &str) -> usize {
        self.topics.remove(topic).map_or(0, |queue| queue.len())
    }

    /// Drop every expired entry from every topic.  Returns the number
    /// removed.
    ///
    /// Run once per cycle so topics nobody consumes do not grow without
    /// bound.
    pub fn remove_stale(&mut self) -> usize {
        let now = self.now;
        let mut removed = 0;
        self.topics.retain(|_, queue| {
            let before = queue.len();
            queue.retain(|r| r.is_live(now));
            removed += before - queue.len();
            !queue.is_empty()
        });
        if removed > 0 {
            debug!(cycle = %now, removed, "swept stale requests");
        }
        removed
    }
}
