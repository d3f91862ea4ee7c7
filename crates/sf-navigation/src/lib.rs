//! `sf-navigation` — the navigable grid, A* pathfinder, path smoothing, and
//! steering composite that together drive a mover across the floor.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|--------------------------------------------------------------|
//! | [`grid`]     | `NavigableGrid` — traversable cells and heatmap weights      |
//! | [`astar`]    | `Graph`, `Pathfinder`, `Vertex` — A* with heatmap replanning  |
//! | [`smoothing`]| Quadratic-Bezier path smoothing                              |
//! | [`steering`] | Border repulsion, collision, predictive avoidance, seek-arrive|
//! | [`context`]  | `NavigationContext`, `NeighborInfo` — ephemeral per-call state|
//! | [`error`]    | `NavError`, `NavResult<T>`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public value types.       |

pub mod astar;
pub mod context;
pub mod error;
pub mod grid;
pub mod smoothing;
pub mod steering;

#[cfg(test)]
mod tests;

pub use astar::{Graph, Pathfinder, Vertex};
pub use context::{NavigationContext, NeighborInfo};
pub use error::{NavError, NavResult};
pub use grid::{Cell, NavigableGrid};
pub use steering::{steer, SteeringInput, SteeringOutput};
