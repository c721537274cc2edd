//! The closed set of node variants and their tick semantics.

use std::collections::HashSet;

use tracing::{trace, warn};

use crate::{BehaviorError, BehaviorResult, CursorStore, Status};

/// A leaf body: gets the agent and the caller's context, returns a status.
pub type Action<'a, A, C> = Box<dyn Fn(&mut A, &mut C) -> Status + 'a>;

/// One node of a behavior tree over agents of type `A` with context `C`.
///
/// Trees are cheap to build and meant to be rebuilt every cycle.  The
/// lifetime lets leaf closures borrow data that lives as long as the tree.
pub enum Node<'a, A, C> {
    /// Runs `action` and reports its result verbatim.
    Leaf {
        id:     String,
        action: Action<'a, A, C>,
    },

    /// Children left to right; the first `Failure` fails the node.
    Sequence {
        id:       String,
        children: Vec<Node<'a, A, C>>,
    },

    /// Children left to right; the first `Success` succeeds the node.
    Selector {
        id:       String,
        children: Vec<Node<'a, A, C>>,
    },

    /// `Success` ends the repeat; anything else reports `Running`.
    RepeatUntilSuccess {
        id:    String,
        child: Box<Node<'a, A, C>>,
    },

    /// `Failure` ends the repeat; anything else reports `Running`.
    RepeatUntilFailure {
        id:    String,
        child: Box<Node<'a, A, C>>,
    },
}

// ── Constructors ──────────────────────────────────────────────────────────────

pub fn leaf<'a, A, C, F>(id: impl Into<String>, action: F) -> Node<'a, A, C>
where
    F: Fn(&mut A, &mut C) -> Status + 'a,
{
    Node::Leaf { id: id.into(), action: Box::new(action) }
}

pub fn sequence<'a, A, C>(id: impl Into<String>, children: Vec<Node<'a, A, C>>) -> Node<'a, A, C> {
    Node::Sequence { id: id.into(), children }
}

pub fn selector<'a, A, C>(id: impl Into<String>, children: Vec<Node<'a, A, C>>) -> Node<'a, A, C> {
    Node::Selector { id: id.into(), children }
}

pub fn repeat_until_success<'a, A, C>(id: impl Into<String>, child: Node<'a, A, C>) -> Node<'a, A, C> {
    Node::RepeatUntilSuccess { id: id.into(), child: Box::new(child) }
}

pub fn repeat_until_failure<'a, A, C>(id: impl Into<String>, child: Node<'a, A, C>) -> Node<'a, A, C> {
    Node::RepeatUntilFailure { id: id.into(), child: Box::new(child) }
}

// ── Node ──────────────────────────────────────────────────────────────────────

impl<'a, A, C> Node<'a, A, C> {
    pub fn id(&self) -> &str {
        match self {
            Node::Leaf { id, .. }
            | Node::Sequence { id, .. }
            | Node::Selector { id, .. }
            | Node::RepeatUntilSuccess { id, .. }
            | Node::RepeatUntilFailure { id, .. } => id,
        }
    }

    /// Evaluate this node once for `agent`.
    ///
    /// `cursors` is the agent's durable cursor slot.  Composite nodes take
    /// their cursor on entry and write it back only if they return
    /// `Running`.
    pub fn tick<S>(&self, agent: &mut A, ctx: &mut C, cursors: &mut S) -> Status
    where
        S: CursorStore + ?Sized,
    {
        let status = match self {
            Node::Leaf { action, .. } => action(agent, ctx),
            Node::Sequence { id, children } => {
                tick_children(id, children, Status::Success, agent, ctx, cursors)
            }
            Node::Selector { id, children } => {
                tick_children(id, children, Status::Failure, agent, ctx, cursors)
            }
            Node::RepeatUntilSuccess { child, .. } => match child.tick(agent, ctx, cursors) {
                Status::Success => Status::Success,
                _ => Status::Running,
            },
            Node::RepeatUntilFailure { child, .. } => match child.tick(agent, ctx, cursors) {
                Status::Failure => Status::Failure,
                _ => Status::Running,
            },
        };
        trace!(node = self.id(), %status, "tick");
        status
    }

    /// Check that no id appears twice in this tree.
    pub fn validate(&self) -> BehaviorResult<()> {
        let mut seen = HashSet::new();
        self.collect_ids(&mut seen)
    }

    fn collect_ids<'n>(&'n self, seen: &mut HashSet<&'n str>) -> BehaviorResult<()> {
        if !seen.insert(self.id()) {
            return Err(BehaviorError::DuplicateNodeId(self.id().to_owned()));
        }
        match self {
            Node::Leaf { .. } => Ok(()),
            Node::Sequence { children, .. } | Node::Selector { children, .. } => {
                children.iter().try_for_each(|c| c.collect_ids(seen))
            }
            Node::RepeatUntilSuccess { child, .. } | Node::RepeatUntilFailure { child, .. } => {
                child.collect_ids(seen)
            }
        }
    }
}

/// Shared body of `Sequence` and `Selector`.
///
/// `pass` is the child result that moves on to the next child (`Success`
/// for a sequence, `Failure` for a selector); it is also the node's result
/// once every child has passed.  Any other terminal result short-circuits.
fn tick_children<A, C, S>(
    id:       &str,
    children: &[Node<'_, A, C>],
    pass:     Status,
    agent:    &mut A,
    ctx:      &mut C,
    cursors:  &mut S,
) -> Status
where
    S: CursorStore + ?Sized,
{
    let start = match cursors.take_cursor(id) {
        Some(idx) if idx < children.len() => idx,
        Some(idx) => {
            warn!(node = id, idx, len = children.len(), "cursor out of range; restarting at 0");
            0
        }
        None => 0,
    };

    for (idx, child) in children.iter().enumerate().skip(start) {
        match child.tick(agent, ctx, cursors) {
            Status::Running => {
                cursors.put_cursor(id, idx);
                return Status::Running;
            }
            status if status == pass => continue,
            status => return status,
        }
    }
    pass
}
