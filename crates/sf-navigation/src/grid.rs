//! Navigable grid (component C2): a uniform cell grid over the floor
//! carrying dynamic congestion weights ("heatmap").
//!
//! The grid's *keys* are the set of traversable cells — a cell with no
//! entry is non-navigable, full stop. Weight is only ever queried or
//! mutated on cells that are already keys.

use std::collections::HashMap;

use sf_core::Vec2;

/// Integer cell coordinates. `(0,0)` is the cell covering the floor origin.
pub type Cell = (i32, i32);

/// A uniform grid over the floor. Cell `(x, y)` spans
/// `[x·cell_size.x, (x+1)·cell_size.x) × [y·cell_size.y, (y+1)·cell_size.y)`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigableGrid {
    pub cell_size: Vec2,
    weights: HashMap<Cell, u32>,
}

impl NavigableGrid {
    /// An empty grid with no traversable cells — callers add cells via
    /// [`mark_navigable`](Self::mark_navigable) while building from a
    /// blueprint.
    pub fn new(cell_size: Vec2) -> Self {
        Self {
            cell_size,
            weights: HashMap::new(),
        }
    }

    /// Build a rectangular grid of `width × height` cells, all navigable
    /// with weight zero. Convenience for tests and simple blueprints.
    pub fn rectangular(cell_size: Vec2, width: i32, height: i32) -> Self {
        let mut grid = Self::new(cell_size);
        for x in 0..width {
            for y in 0..height {
                grid.mark_navigable((x, y));
            }
        }
        grid
    }

    /// Mark `cell` as traversable (weight starts at zero if not already
    /// present). Idempotent.
    pub fn mark_navigable(&mut self, cell: Cell) {
        self.weights.entry(cell).or_insert(0);
    }

    /// The cell containing `point`.
    #[inline]
    pub fn cell_of(&self, point: Vec2) -> Cell {
        (
            (point.x / self.cell_size.x).floor() as i32,
            (point.y / self.cell_size.y).floor() as i32,
        )
    }

    /// `true` if `cell` is a traversable grid key.
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.weights.contains_key(&cell)
    }

    /// Congestion weight of `cell`. Zero for unknown cells — callers must
    /// check [`contains`](Self::contains) before treating a cell as
    /// navigable; this never panics or implies navigability.
    #[inline]
    pub fn weight(&self, cell: Cell) -> u32 {
        self.weights.get(&cell).copied().unwrap_or(0)
    }

    /// Add `delta` to `cell`'s weight. No-op on a non-navigable cell.
    pub fn add_weight(&mut self, cell: Cell, delta: u32) {
        if let Some(w) = self.weights.get_mut(&cell) {
            *w = w.saturating_add(delta);
        }
    }

    /// Subtract `delta` from `cell`'s weight, saturating to zero. No-op on
    /// a non-navigable cell.
    pub fn sub_weight(&mut self, cell: Cell, delta: u32) {
        if let Some(w) = self.weights.get_mut(&cell) {
            *w = w.saturating_sub(delta);
        }
    }

    /// Reset every traversable cell's weight to zero, keeping the set of
    /// navigable cells unchanged.
    pub fn clear_weights(&mut self) {
        for w in self.weights.values_mut() {
            *w = 0;
        }
    }

    /// Iterate all navigable cells, for graph construction.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.weights.keys().copied()
    }

    /// Number of navigable cells.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// World-space center of `cell`, regardless of whether it is navigable.
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        Vec2::new(
            (cell.0 as f32 + 0.5) * self.cell_size.x,
            (cell.1 as f32 + 0.5) * self.cell_size.y,
        )
    }

    /// Diagonal length of one cell — the replan-distance trigger in §4.3
    /// compares the agent's distance to its path head against this value.
    pub fn cell_diagonal(&self) -> f32 {
        self.cell_size.length()
    }

    /// Distribute `unit_cell_weight` across the grid cells touched by a
    /// rectangle's four corners, each corner contributing a quarter of the
    /// unit's `cell_weight` (§4.2). Corners outside any navigable cell
    /// contribute nothing (the grid's `add_weight` is already a no-op for
    /// non-navigable cells).
    pub fn add_footprint_weight(&mut self, corners: [Vec2; 4], unit_cell_weight: u32) {
        let share = unit_cell_weight / 4;
        for corner in corners {
            let cell = self.cell_of(corner);
            self.add_weight(cell, share);
        }
    }

    /// Inverse of [`add_footprint_weight`](Self::add_footprint_weight) — used
    /// when recomputing a mover's footprint before re-adding it this tick.
    pub fn sub_footprint_weight(&mut self, corners: [Vec2; 4], unit_cell_weight: u32) {
        let share = unit_cell_weight / 4;
        for corner in corners {
            let cell = self.cell_of(corner);
            self.sub_weight(cell, share);
        }
    }
}
