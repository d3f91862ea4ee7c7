//! Navigation-subsystem error type.

use thiserror::Error;

use crate::grid::Cell;

/// Errors produced by `sf-navigation`.
///
/// Per the navigation-failure policy: callers treat these as recoverable —
/// log and leave the agent's path unchanged — never as a reason to abort
/// the tick.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("cell {0:?} is not in the navigable grid")]
    CellNotInGrid(Cell),

    #[error("pathfinder queue overflowed at capacity {0}")]
    QueueOverflow(usize),
}

pub type NavResult<T> = Result<T, NavError>;
