//! Engine observer hooks (grounded on `dt_sim::SimObserver`): the "per-tick
//! metrics" contract spec.md §1 says the core exposes to external
//! collaborators, without this workspace implementing any particular sink
//! (no file writing, no rendering — per §1's Non-goals).

use sf_core::{MoverId, ProducerId, Tick};
use sf_product::CompletedRecord;

/// Aggregate counters an [`EngineObserver`] is handed once per tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct EngineMetrics {
    pub tick: Tick,
    pub collision_count: u64,
    pub in_progress_products: usize,
    pub completed_products: usize,
}

/// Callbacks invoked by [`crate::engine::Engine::tick`] at key points.
///
/// All methods have default no-op implementations so implementors only
/// override what they care about — the same shape as the teacher's
/// `SimObserver`.
pub trait EngineObserver {
    /// Called once per tick after the registry has stepped, with the
    /// tick's aggregate counters.
    fn on_tick(&mut self, _metrics: EngineMetrics) {}

    /// A unit's `state` became `Blocked` (collision, `ToggleState`, or a
    /// disabled mover).
    fn on_unit_blocked(&mut self, _mover: Option<MoverId>, _producer: Option<ProducerId>) {}

    /// A mover registered a new collision episode this tick (§4.5).
    fn on_collision(&mut self, _mover: MoverId) {}

    /// A product's recipe finished and moved into the completed tracker.
    fn on_product_complete(&mut self, _record: &CompletedRecord) {}

    /// A broker `Complete` handshake exhausted its retry budget (§7: logged
    /// failure, non-fatal — the product stays in the in-progress tracker).
    fn on_complete_retry_exhausted(&mut self, _unit: &str) {}
}

/// An [`EngineObserver`] that does nothing. Use when driving [`crate::engine::Engine::tick`]
/// without caring about callbacks (e.g. the scenario tests in [`crate::tests`]).
pub struct NoopObserver;

impl EngineObserver for NoopObserver {}
