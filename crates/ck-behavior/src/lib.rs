//! `ck-behavior`: behavior trees whose execution position survives a full
//! teardown of the program between cycles.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`status`] | `Status` (`Success`, `Failure`, `Running`)                 |
//! | [`node`]   | `Node` enum and the `leaf`/`sequence`/… constructors       |
//! | [`cursor`] | `CursorStore` trait: where resume points are persisted    |
//! | [`error`]  | `BehaviorError`, `BehaviorResult<T>`                       |
//!
//! # Design notes
//!
//! A tree is rebuilt from scratch every cycle, so nodes hold no state.  The
//! only thing that survives is a *cursor* per composite node: the index of
//! the child that last returned `Running`.  Cursors live in the agent's
//! durable record (any [`CursorStore`]), keyed by node id:
//!
//! 1. On tick, a composite node **takes** its cursor (read-and-clear) and
//!    resumes at that child, or at child 0 if there is none.
//! 2. If a child returns `Running`, the node writes the child's index back
//!    and returns `Running`.
//! 3. Otherwise the node completes and leaves no cursor behind.
//!
//! The stored index *is* the continuation; no coroutines are involved.
//! Because cursors are keyed by id alone, node ids must be unique within
//! an agent's trees: [`Node::validate`] checks one tree.

pub mod cursor;
pub mod error;
pub mod node;
pub mod status;


pub use cursor::CursorStore;
pub use error::{BehaviorError, BehaviorResult};
pub use node::{
    Action, Node, leaf, repeat_until_failure, repeat_until_success, selector, sequence,
};
pub use status::Status;
