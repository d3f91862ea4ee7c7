//! `sf-core` — foundational types for the smart-factory simulation engine.
//!
//! This crate is a dependency of every other `sf-*` crate.  It intentionally
//! has no `sf-*` dependencies and minimal external ones (`thiserror`, `rand`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                |
//! |-----------------|----------------------------------------------------------|
//! | [`ids`]         | `MoverId`, `ProducerId`, `ProductId`                      |
//! | [`geo`]         | `Vec2`, `Rect`, SAT overlap, segment-rect intersection    |
//! | [`time`]        | `Tick`, `EngineClock`, `EngineConfig`                     |
//! | [`interaction`] | `Interaction` enum, URL bijection                         |
//! | [`rng`]         | `SimRng` — seeded RNG used by test property checks        |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod interaction;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

pub use error::{CoreError, CoreResult};
pub use geo::{Rect, Vec2};
pub use ids::{MoverId, ProducerId, ProductId};
pub use interaction::Interaction;
pub use rng::SimRng;
pub use time::{EngineClock, EngineConfig, Tick};
