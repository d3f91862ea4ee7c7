//! A* pathfinder (component C3, base variant): a graph built once from the
//! navigable grid's keys, searched with a fixed-capacity binary heap and an
//! octile heuristic.
//!
//! Heatmap-aware replanning (the "when do I re-run this" policy) lives in
//! [`crate::context`]/the mover model, not here — this module only answers
//! "find me *a* path right now".

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::error::{NavError, NavResult};
use crate::grid::{Cell, NavigableGrid};

/// √2, the diagonal step cost.
const SQRT2: f32 = std::f32::consts::SQRT_2;

const STRAIGHT_DIRS: [Cell; 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL_DIRS: [Cell; 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// A search-graph node. Stored in the open/closed bookkeeping during a
/// single `find_path` call — not persisted across calls.
#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub cell: Cell,
    pub g: f32,
    pub h: f32,
    pub f: f32,
    pub prev: Option<Cell>,
    pub steps: u32,
    pub cell_weight: u32,
}

/// Adjacency for one cell, split into straight (≤4) and diagonal (≤4)
/// navigable neighbors, per the data model.
#[derive(Clone, Debug, Default)]
struct Adjacency {
    straight: Vec<Cell>,
    diagonal: Vec<Cell>,
}

/// The search graph: adjacency built once from the grid's navigable cells.
/// Rebuild (via [`Graph::build`]) whenever the grid's *set* of navigable
/// cells changes — weight-only changes do not require a rebuild, since
/// weights are looked up live from the grid during search.
pub struct Graph {
    adjacency: HashMap<Cell, Adjacency>,
}

impl Graph {
    /// Build the graph once from `grid`'s current navigable cells (its
    /// keys). Diagonal neighbors are only recorded if *both* cardinal
    /// neighbors of that diagonal are also navigable, so the search never
    /// needs to re-check corner-cutting — it is encoded in the adjacency.
    pub fn build(grid: &NavigableGrid) -> Self {
        let mut adjacency = HashMap::with_capacity(grid.len());
        for cell in grid.cells() {
            let mut adj = Adjacency::default();
            for (dx, dy) in STRAIGHT_DIRS {
                let n = (cell.0 + dx, cell.1 + dy);
                if grid.contains(n) {
                    adj.straight.push(n);
                }
            }
            for (dx, dy) in DIAGONAL_DIRS {
                let n = (cell.0 + dx, cell.1 + dy);
                if !grid.contains(n) {
                    continue;
                }
                // No corner-cutting: both cardinal neighbors of the diagonal
                // step must be navigable.
                let side_a = (cell.0 + dx, cell.1);
                let side_b = (cell.0, cell.1 + dy);
                if grid.contains(side_a) && grid.contains(side_b) {
                    adj.diagonal.push(n);
                }
            }
            adjacency.insert(cell, adj);
        }
        Self { adjacency }
    }

    fn neighbors(&self, cell: Cell) -> impl Iterator<Item = (Cell, f32)> + '_ {
        let adj = self.adjacency.get(&cell);
        let straight = adj.map(|a| a.straight.as_slice()).unwrap_or(&[]);
        let diagonal = adj.map(|a| a.diagonal.as_slice()).unwrap_or(&[]);
        straight
            .iter()
            .map(|&c| (c, 1.0))
            .chain(diagonal.iter().map(|&c| (c, SQRT2)))
    }
}

/// Octile heuristic: admissible and consistent on a uniform 8-connected
/// grid with straight cost 1 and diagonal cost √2.
pub fn octile_heuristic(from: Cell, to: Cell) -> f32 {
    let dx = (from.0 - to.0).unsigned_abs() as f32;
    let dy = (from.1 - to.1).unsigned_abs() as f32;
    SQRT2 * (dx + dy) + (1.0 - 2.0 * SQRT2) * dx.min(dy)
}

#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    f: f32,
    seq: u64,
    cell: Cell,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}
impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    /// Lower `f` wins; ties break on insertion order (earlier first) — the
    /// heap itself provides no ordering guarantee beyond this, matching
    /// §4.3's "stable enough for the use case".
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .partial_cmp(&other.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Fixed-capacity binary heap. Pushing past capacity silently drops the
/// insertion (§4.3: "queue overflow → insertion silently dropped; search
/// may fail") rather than growing or erroring.
struct BoundedHeap {
    heap: BinaryHeap<Reverse<OpenEntry>>,
    capacity: usize,
    next_seq: u64,
    overflowed: bool,
}

impl BoundedHeap {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            capacity,
            next_seq: 0,
            overflowed: false,
        }
    }

    fn push(&mut self, f: f32, cell: Cell) {
        if self.heap.len() >= self.capacity {
            self.overflowed = true;
            return;
        }
        let entry = OpenEntry { f, seq: self.next_seq, cell };
        self.next_seq += 1;
        self.heap.push(Reverse(entry));
    }

    fn pop(&mut self) -> Option<Cell> {
        self.heap.pop().map(|Reverse(e)| e.cell)
    }
}

/// A* search over a [`Graph`], reading live weights from a [`NavigableGrid`].
pub struct Pathfinder {
    queue_capacity: usize,
}

impl Pathfinder {
    pub fn new(queue_capacity: usize) -> Self {
        Self { queue_capacity }
    }

    /// Find a path of cells from `start` to `goal`, inclusive of both ends.
    ///
    /// Returns [`NavError::CellNotInGrid`] if either endpoint is not
    /// navigable (§4.3's "start or goal cell not in grid → no path
    /// produced"). Returns `Ok(None)` if the open set empties (or the
    /// bounded queue overflows) without reaching the goal — the caller's
    /// path is left unchanged in both cases.
    pub fn find_path(
        &self,
        graph: &Graph,
        grid: &NavigableGrid,
        start: Cell,
        goal: Cell,
    ) -> NavResult<Option<Vec<Cell>>> {
        if !grid.contains(start) {
            return Err(NavError::CellNotInGrid(start));
        }
        if !grid.contains(goal) {
            return Err(NavError::CellNotInGrid(goal));
        }
        if start == goal {
            return Ok(Some(vec![start]));
        }

        let mut vertices: HashMap<Cell, Vertex> = HashMap::new();
        let mut closed: HashMap<Cell, bool> = HashMap::new();
        let mut open = BoundedHeap::with_capacity(self.queue_capacity);

        let h0 = octile_heuristic(start, goal);
        vertices.insert(
            start,
            Vertex {
                cell: start,
                g: 0.0,
                h: h0,
                f: h0,
                prev: None,
                steps: 0,
                cell_weight: grid.weight(start),
            },
        );
        open.push(h0, start);

        while let Some(cell) = open.pop() {
            if *closed.get(&cell).unwrap_or(&false) {
                continue;
            }
            closed.insert(cell, true);

            if cell == goal {
                return Ok(Some(reconstruct(&vertices, goal)));
            }

            let current = *vertices.get(&cell).expect("popped cell must have a vertex");
            for (neighbor, step_cost) in graph.neighbors(cell) {
                if *closed.get(&neighbor).unwrap_or(&false) {
                    continue;
                }
                // Heatmap penalty: traversing out of `cell` accrues `cell`'s
                // own congestion weight, per §4.3's g-step definition.
                let tentative_g = current.g + step_cost + current.cell_weight as f32;

                let better = match vertices.get(&neighbor) {
                    Some(existing) => tentative_g < existing.g,
                    None => true,
                };
                if better {
                    let h = octile_heuristic(neighbor, goal);
                    vertices.insert(
                        neighbor,
                        Vertex {
                            cell: neighbor,
                            g: tentative_g,
                            h,
                            f: tentative_g + h,
                            prev: Some(cell),
                            steps: current.steps + 1,
                            cell_weight: grid.weight(neighbor),
                        },
                    );
                    open.push(tentative_g + h, neighbor);
                }
            }
        }

        Ok(None)
    }
}

fn reconstruct(vertices: &HashMap<Cell, Vertex>, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut cur = goal;
    while let Some(prev) = vertices.get(&cur).and_then(|v| v.prev) {
        path.push(prev);
        cur = prev;
    }
    path.reverse();
    path
}
