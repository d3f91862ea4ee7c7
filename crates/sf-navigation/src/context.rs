//! `NavigationContext` — the ephemeral per-call bundle a single `navigate`
//! invocation reads from; it owns nothing and lives only for the duration
//! of that call (per the data model's "Lifetime = one navigate call").

use sf_core::{Rect, Vec2};

use crate::grid::NavigableGrid;

/// A snapshot of one nearby mover, as seen from a spatial-hash neighbor
/// query. Deliberately a plain value type (not a reference to the actual
/// mover) so the navigation crate never depends on `sf-agent`.
#[derive(Clone, Copy, Debug)]
pub struct NeighborInfo {
    pub position: Vec2,
    pub dimension: Vec2,
    pub velocity: Vec2,
}

impl NeighborInfo {
    pub fn footprint(&self) -> Rect {
        Rect::new(self.position, self.dimension)
    }

    /// Where this neighbor's footprint will be after one more tick, assuming
    /// its velocity is unchanged — used by predictive avoidance.
    pub fn predicted_footprint(&self) -> Rect {
        Rect::new(self.position + self.velocity, self.dimension)
    }
}

/// Everything one call to the pathfinder + steering composite needs: the
/// grid (for replanning), the nearby movers (for collision/avoidance), and
/// the static borders (for border repulsion).
pub struct NavigationContext<'a> {
    pub grid: &'a NavigableGrid,
    pub neighbors: &'a [NeighborInfo],
    pub borders: &'a [sf_core::geo::Segment],
}

impl<'a> NavigationContext<'a> {
    pub fn new(
        grid: &'a NavigableGrid,
        neighbors: &'a [NeighborInfo],
        borders: &'a [sf_core::geo::Segment],
    ) -> Self {
        Self { grid, neighbors, borders }
    }
}
