//! Framework error type.
//!
//! Sub-crates define their own error enums and convert into `CoreError` via
//! `From`, or wrap `CoreError` as one variant — both patterns are used
//! elsewhere in this workspace; prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::{MoverId, ProducerId};

/// The top-level error type for `sf-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("mover {0} not found")]
    MoverNotFound(MoverId),

    #[error("producer {0} not found")]
    ProducerNotFound(ProducerId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown interaction URL: {0}")]
    UnknownInteractionUrl(String),
}

/// Shorthand result type for all `sf-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
