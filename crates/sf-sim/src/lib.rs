//! `sf-sim` — the environment registry (C7), tick scheduler (C8), and the
//! `Engine` facade that ties navigation, agents, products, and the bidding
//! broker protocol (C10/C11) into one simulation loop.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                    |
//! |------------|--------------------------------------------------------------|
//! | [`registry`]| `Registry`, `BlueprintSpec`, `UnitRef` — the floor's state   |
//! | [`scheduler`]| `TickScheduler` — update/render/counter threads             |
//! | [`events`]  | `TickEvent` — per-tick outcomes the engine reacts to         |
//! | [`observer`]| `EngineObserver`, `EngineMetrics` — per-tick callback hooks  |
//! | [`engine`]  | `Engine` — the single entry point (§9)                       |
//! | [`error`]   | `SimError`, `SimResult<T>`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public value types.       |

pub mod engine;
pub mod error;
pub mod events;
pub mod observer;
pub mod registry;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use engine::{Engine, RenderSnapshot, UnitKind, UnitSnapshot};
pub use error::{SimError, SimResult};
pub use events::TickEvent;
pub use observer::{EngineMetrics, EngineObserver, NoopObserver};
pub use registry::{BlueprintMover, BlueprintProducer, BlueprintSpec, Registry, UnitRef};
pub use scheduler::TickScheduler;
