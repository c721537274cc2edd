//! Kernel error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `CoreError` or wrap `CoreError` as one variant.

use thiserror::Error;

/// The error type for `ck-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ck-core`.
pub type CoreResult<T> = Result<T, CoreError>;
