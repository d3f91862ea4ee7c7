//! Simulation time model and top-level tuning parameters.
//!
//! Time is a monotonically increasing `Tick` counter, matching the tick
//! scheduler's (C8) contract: the update loop owns the only writer of
//! `Tick`, everything else only reads it.

use std::fmt;
use std::time::Duration;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── EngineClock ───────────────────────────────────────────────────────────────

/// Tracks the current tick and whether the engine is paused.
///
/// Mutated only by the tick scheduler's update loop (§4.8). Starts paused
/// per §8's boundary behavior ("Starting paused: no movers move until Pause
/// is toggled").
#[derive(Clone, Debug, Default)]
pub struct EngineClock {
    pub current_tick: Tick,
    pub paused: bool,
    pub running: bool,
}

impl EngineClock {
    pub fn new() -> Self {
        Self {
            current_tick: Tick::ZERO,
            paused: true,
            running: false,
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick.next();
    }
}

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Every tunable named in spec.md §6's "Configuration enumeration".
///
/// Loaded from `EngineConfig::default()` plus an optional TOML overlay by
/// the application (see the `demos/basic` binary) — no parsing lives in
/// this crate itself.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Target update-loop rate, updates/second.
    pub target_ups: u32,
    /// Target render-loop rate, frames/second.
    pub target_fps: u32,
    /// Ticks after which the update loop shuts down on its own. `0` means
    /// unbounded.
    pub tick_cap: u64,
    /// Distance (mm) within which a mover is considered "arrived" at a
    /// destination.
    pub arrival_radius: f32,
    /// Ticks a mover ignores further collision counting after a collision
    /// is first detected (§4.5).
    pub collision_cooldown_ticks: u32,
    /// Cell-weight threshold above which the heatmap pathfinder variant
    /// forces a replan (§4.3).
    pub heatmap_threshold: u32,
    /// How many ticks the heatmap check is throttled to (evaluate once per
    /// this many ticks once the mover already has a path).
    pub heatmap_check_interval_ticks: u32,
    /// Quadratic-Bezier samples generated per interior waypoint (§4.3).
    pub bezier_segments_per_corner: u32,
    /// Fixed capacity of the A* open-set binary heap (§4.3).
    pub pathfinder_queue_capacity: usize,
    /// Max retry attempts for broker Create/Complete handshakes (§4.10).
    pub broker_retry_count: u32,
    /// Delay between broker retry attempts.
    pub broker_retry_interval: Duration,
    /// Hold period after a target-rate adjustment during which automatic
    /// rate correction must not touch the loop interval (§4.8).
    pub rate_adjustment_hold: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_ups: 60,
            target_fps: 60,
            tick_cap: 0,
            arrival_radius: 5.0,
            collision_cooldown_ticks: 30,
            heatmap_threshold: 3,
            heatmap_check_interval_ticks: 10,
            bezier_segments_per_corner: 5,
            pathfinder_queue_capacity: 250,
            broker_retry_count: 10,
            broker_retry_interval: Duration::from_millis(500),
            rate_adjustment_hold: Duration::from_millis(2_500),
        }
    }
}

impl EngineConfig {
    #[inline]
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(1_000 / self.target_ups.max(1) as u64)
    }

    #[inline]
    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(1_000 / self.target_fps.max(1) as u64)
    }
}
