//! Strongly typed string identifiers.
//!
//! Processes, topics and agents are all named by the managers that create
//! them (`"spawn:W1N1"`, `"harvest"`, `"worker-7"`), so every ID wraps a
//! `String`.  All IDs are `Ord + Hash` so they can key both `HashMap`s and
//! the `BTreeMap`s used wherever iteration order must be deterministic.

use std::borrow::Borrow;
use std::fmt;

/// Generate a typed ID wrapper around a `String`.
macro_rules! named_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(String);

        impl $name {
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

named_id! {
    /// Name of an agent (a worker unit).  Keys the agent's durable record.
    pub struct AgentId;
}

named_id! {
    /// Unique name of a scheduled process.
    pub struct ProcessId;
}

named_id! {
    /// Name of a topic in the topic store.
    pub struct TopicId;
}
