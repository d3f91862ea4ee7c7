//! `sf-agent` — the Mover (C5) and Producer (C6) agent models.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|--------------------------------------------------------------|
//! | [`unit`]    | `UnitState`, `Direction` — shared by movers and producers     |
//! | [`mover`]   | `Mover`, `IsBlocked`/`GetFreeDirections`, transport lifecycle |
//! | [`producer`]| `Producer`, queue + processing state machine                 |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public value types.       |

pub mod error;
pub mod mover;
pub mod producer;
pub mod unit;

#[cfg(test)]
mod tests;

pub use error::{AgentError, AgentResult};
pub use mover::{CardinalSet, Mover};
pub use producer::Producer;
pub use unit::{Direction, UnitState};
