//! `ck-topic`: named priority queues that match producers of work to
//! consumers without coupling them.
//!
//! # Crate layout
//!
//! | Module      | Contents                                         |
//! |-------------|--------------------------------------------------|
//! | [`request`] | `Request<T>`: priority, payload, expiry         |
//! | [`store`]   | `TopicStore<T>`                                  |
//! | [`error`]   | `TopicError`, `TopicResult<T>`                   |
//!
//! # Queue model (summary)
//!
//! ```text
//! topic "harvest":  [p=1, p=3, p=3', p=5]      ascending by priority
//!                                       ^ get_next_request pops here
//! ```
//!
//! Equal priorities are stored newest-first so that popping from the high
//! end returns them in insertion order.  A request is live while
//! `now <= expiry`; consuming calls never hand out a dead one.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                            |
//! |-----------|---------------------------------------------------|
//! | `fx-hash` | Uses `FxHashMap` for the topic table.             |
//! | `serde`   | Derives `Serialize`/`Deserialize` on `Request<T>`.|

pub mod error;
pub mod request;
pub mod store;


pub use error::{TopicError, TopicResult};
pub use request::Request;
pub use store::TopicStore;
