//! A prioritized, expiring unit of work published to a topic.

use ck_core::Cycle;

/// One entry in a topic.
///
/// `details` is opaque to the store; managers decide what it carries
/// (a target id, a body template, …) and what each priority band means.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Request<T> {
    /// Higher is more urgent.
    pub priority: f64,

    pub details: T,

    /// Cycle the request was published in.
    pub created: Cycle,

    /// Last cycle in which the request may be handed out.
    pub expiry: Cycle,
}

impl<T> Request<T> {
    /// `true` while the request may still be consumed at cycle `now`.
    #[inline]
    pub fn is_live(&self, now: Cycle) -> bool {
        now <= self.expiry
    }

    /// Cycles left before expiry, or `None` if already dead.
    pub fn remaining(&self, now: Cycle) -> Option<u64> {
        self.is_live(now).then(|| self.expiry - now)
    }
}
