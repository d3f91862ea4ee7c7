//! Environment registry (component C7): owns every mover and producer,
//! the navigable grid and its graph, and drives one tick of the whole
//! floor — producers before movers, per §4.7's ordering rule.

use std::collections::HashMap;

use sf_core::geo::Segment;
use sf_core::{EngineConfig, Interaction, MoverId, ProducerId, Vec2};
use tracing::warn;

use sf_agent::{AgentResult, Mover, Producer, UnitState};
use sf_navigation::context::NeighborInfo;
use sf_navigation::smoothing::smooth_path;
use sf_navigation::steering::{steer, SteeringInput};
use sf_navigation::{Graph, NavigableGrid, NavigationContext, Pathfinder};

use crate::events::TickEvent;

/// Disambiguates a dynamic unit-under-cursor reference between the two
/// kinds of unit the registry owns (a supplemented feature used by the
/// engine facade's `UnitAt` query).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum UnitRef {
    Mover(MoverId),
    Producer(ProducerId),
}

/// Plain in-memory description of one mover, as a caller hands it to
/// [`Registry::from_blueprint`]. No JSON/TOML parsing lives in this crate —
/// building one of these from a file is the caller's concern (see
/// `demos/basic`).
#[derive(Clone, Debug)]
pub struct BlueprintMover {
    pub name: String,
    pub position: Vec2,
    pub dimension: Vec2,
    /// Congestion this mover's footprint contributes to any cell it
    /// occupies, split four ways across its corners (§4.2). Must be large
    /// enough that `cell_weight / 4` is nonzero for the heatmap to ever see
    /// it — `4` (one full unit per corner) is the usual choice.
    pub cell_weight: u32,
}

/// Plain in-memory description of one producer.
#[derive(Clone, Debug)]
pub struct BlueprintProducer {
    pub name: String,
    pub position: Vec2,
    pub dimension: Vec2,
    pub processer_position: Vec2,
    pub interaction_cost: HashMap<Interaction, u32>,
}

/// The full floor layout a [`Registry`] is built from.
#[derive(Clone, Debug)]
pub struct BlueprintSpec {
    /// Floor width/height in millimetres; the grid is sized to cover it.
    pub floor_extent: Vec2,
    pub cell_size: Vec2,
    pub movers: Vec<BlueprintMover>,
    pub producers: Vec<BlueprintProducer>,
    pub borders: Vec<Segment>,
}

pub struct Registry {
    grid: NavigableGrid,
    graph: Graph,
    pathfinder: Pathfinder,
    borders: Vec<Segment>,

    movers: Vec<Mover>,
    mover_names: Vec<String>,
    mover_by_name: HashMap<String, MoverId>,
    mover_prev_corners: Vec<[Vec2; 4]>,
    mover_replan_throttle: Vec<u32>,

    producers: Vec<Producer>,
    producer_names: Vec<String>,
    producer_by_name: HashMap<String, ProducerId>,

    collision_count: u64,

    initial_movers: Vec<Mover>,
    initial_producers: Vec<Producer>,
}

impl Registry {
    pub fn from_blueprint(spec: &BlueprintSpec, config: &EngineConfig) -> Self {
        let width = (spec.floor_extent.x / spec.cell_size.x).ceil().max(1.0) as i32;
        let height = (spec.floor_extent.y / spec.cell_size.y).ceil().max(1.0) as i32;
        let mut grid = NavigableGrid::rectangular(spec.cell_size, width, height);
        let pathfinder = Pathfinder::new(config.pathfinder_queue_capacity);

        let mut movers = Vec::with_capacity(spec.movers.len());
        let mut mover_names = Vec::with_capacity(spec.movers.len());
        let mut mover_by_name = HashMap::with_capacity(spec.movers.len());
        for (i, bm) in spec.movers.iter().enumerate() {
            let id = MoverId(i as u32);
            let mut mover = Mover::new(id, bm.position, bm.dimension);
            mover.cell_weight = bm.cell_weight;
            movers.push(mover);
            mover_names.push(bm.name.clone());
            mover_by_name.insert(bm.name.clone(), id);
        }

        let mut producers = Vec::with_capacity(spec.producers.len());
        let mut producer_names = Vec::with_capacity(spec.producers.len());
        let mut producer_by_name = HashMap::with_capacity(spec.producers.len());
        for (i, bp) in spec.producers.iter().enumerate() {
            let id = ProducerId(i as u32);
            let mut producer = Producer::new(id, bp.position, bp.dimension, bp.processer_position);
            producer.interaction_cost = bp.interaction_cost.clone();
            producers.push(producer);
            producer_names.push(bp.name.clone());
            producer_by_name.insert(bp.name.clone(), id);
        }

        let mut mover_prev_corners = Vec::with_capacity(movers.len());
        for mover in &movers {
            let corners = mover.corners();
            grid.add_footprint_weight(corners, mover.cell_weight);
            mover_prev_corners.push(corners);
        }

        let graph = Graph::build(&grid);

        Self {
            initial_movers: movers.clone(),
            initial_producers: producers.clone(),
            mover_replan_throttle: vec![0; movers.len()],
            grid,
            graph,
            pathfinder,
            borders: spec.borders.clone(),
            movers,
            mover_names,
            mover_by_name,
            mover_prev_corners,
            producers,
            producer_names,
            producer_by_name,
            collision_count: 0,
        }
    }

    // ── Lookups ──────────────────────────────────────────────────────────

    pub fn mover(&self, id: MoverId) -> Option<&Mover> {
        self.movers.get(id.index())
    }

    pub fn mover_mut(&mut self, id: MoverId) -> Option<&mut Mover> {
        self.movers.get_mut(id.index())
    }

    pub fn producer(&self, id: ProducerId) -> Option<&Producer> {
        self.producers.get(id.index())
    }

    pub fn producer_mut(&mut self, id: ProducerId) -> Option<&mut Producer> {
        self.producers.get_mut(id.index())
    }

    pub fn movers(&self) -> &[Mover] {
        &self.movers
    }

    pub fn producers(&self) -> &[Producer] {
        &self.producers
    }

    pub fn mover_name(&self, id: MoverId) -> Option<&str> {
        self.mover_names.get(id.index()).map(String::as_str)
    }

    pub fn producer_name(&self, id: ProducerId) -> Option<&str> {
        self.producer_names.get(id.index()).map(String::as_str)
    }

    pub fn find_mover_by_name(&self, name: &str) -> Option<MoverId> {
        self.mover_by_name.get(name).copied()
    }

    pub fn find_producer_by_name(&self, name: &str) -> Option<ProducerId> {
        self.producer_by_name.get(name).copied()
    }

    pub fn grid(&self) -> &NavigableGrid {
        &self.grid
    }

    pub fn collision_count(&self) -> u64 {
        self.collision_count
    }

    /// `UnitAt`: hit-test every unit's footprint at `point`, movers first.
    /// Used by a UI collaborator for cursor-based inspection (§9).
    pub fn unit_at(&self, point: Vec2) -> Option<UnitRef> {
        for mover in &self.movers {
            if mover.footprint().contains_point(point) {
                return Some(UnitRef::Mover(mover.id));
            }
        }
        for producer in &self.producers {
            if producer.footprint().contains_point(point) {
                return Some(UnitRef::Producer(producer.id));
            }
        }
        None
    }

    // ── Producer commands forwarded from the engine/broker layer ─────────

    pub fn enqueue_producer(&mut self, producer: ProducerId, mover: MoverId) {
        if let Some(p) = self.producers.get_mut(producer.index()) {
            p.enqueue(mover);
        }
    }

    pub fn start_processing(
        &mut self,
        producer: ProducerId,
        interaction: Interaction,
        cost: u32,
    ) -> Option<AgentResult<Option<MoverId>>> {
        self.producers.get_mut(producer.index()).map(|p| p.start_processing(interaction, cost))
    }

    pub fn interaction_cost(&self, producer: ProducerId, interaction: Interaction) -> Option<u32> {
        self.producers.get(producer.index()).map(|p| p.cost_query(interaction))
    }

    pub fn transport_cost(&self, mover: MoverId, producer: ProducerId) -> Option<f32> {
        let producer = self.producers.get(producer.index())?;
        let mover = self.movers.get(mover.index())?;
        Some(mover.transport_cost(producer.processer_position))
    }

    pub fn start_transport(&mut self, mover: MoverId, producer: ProducerId, requester: sf_core::ProductId) {
        if let (Some(mover), Some(producer)) =
            (self.movers.get_mut(mover.index()), self.producers.get(producer.index()))
        {
            mover.start_transport(producer.processer_position, requester);
        }
    }

    /// `ToggleState`: flip a producer's Alive/Blocked state and surface the
    /// bailed movers (§4.6) as tick events for the caller to notify.
    pub fn toggle_producer_state(&mut self, producer: ProducerId) -> Vec<TickEvent> {
        let Some(p) = self.producers.get_mut(producer.index()) else {
            return Vec::new();
        };
        p.toggle_state()
            .into_iter()
            .map(|mover| TickEvent::ProductionBailed { producer, mover })
            .collect()
    }

    // ── Tick ───────────────────────────────────────────────────────────

    /// Step every producer then every mover, returning the events the
    /// engine/broker layer should react to. Producers step first so a
    /// processing completion is visible to the rest of this same tick
    /// (§4.7's ordering rule).
    pub fn step(&mut self, config: &EngineConfig) -> Vec<TickEvent> {
        let mut events = Vec::new();

        for idx in 0..self.producers.len() {
            if let Some(mover) = self.producers[idx].tick() {
                events.push(TickEvent::ProducerInteractionComplete {
                    producer: self.producers[idx].id,
                    mover,
                });
            }
        }

        let hash = self.build_spatial_hash();

        for idx in 0..self.movers.len() {
            let mover_id = self.movers[idx].id;
            if self.movers[idx].disabled || self.movers[idx].state == UnitState::Blocked {
                continue;
            }

            let weight = self.movers[idx].cell_weight;
            self.grid.sub_footprint_weight(self.mover_prev_corners[idx], weight);

            let neighbors = self.neighbors_of(mover_id, &hash);

            self.maybe_replan(idx, config);
            self.movers[idx].advance_path(config.arrival_radius);

            let input = SteeringInput {
                position: self.movers[idx].position,
                velocity: self.movers[idx].velocity,
                dimension: self.movers[idx].dimension,
                max_speed: Mover::MAX_SPEED,
                max_force: Mover::MAX_FORCE,
                arrival_radius: config.arrival_radius,
                seek_target: self.movers[idx].seek_target(),
            };
            let ctx = NavigationContext::new(&self.grid, &neighbors, &self.borders);
            let out = steer(&input, &ctx);

            if out.collision_active && self.movers[idx].on_collision(config.collision_cooldown_ticks) {
                self.collision_count += 1;
                events.push(TickEvent::CollisionDetected { mover: mover_id });
            }
            self.movers[idx].tick_cooldown();
            self.movers[idx].apply_steering(&out);

            let new_corners = self.movers[idx].corners();
            self.grid.add_footprint_weight(new_corners, weight);
            self.mover_prev_corners[idx] = new_corners;

            if self.movers[idx].service_requester.is_some() && self.movers[idx].has_arrived(config.arrival_radius) {
                if let Some(product) = self.movers[idx].complete_transport() {
                    events.push(TickEvent::TransportArrived { mover: mover_id, product });
                }
            }
        }

        events
    }

    fn build_spatial_hash(&self) -> HashMap<(i32, i32), Vec<MoverId>> {
        let mut hash: HashMap<(i32, i32), Vec<MoverId>> = HashMap::with_capacity(self.movers.len());
        for mover in &self.movers {
            hash.entry(self.grid.cell_of(mover.position)).or_default().push(mover.id);
        }
        hash
    }

    /// Neighbors within the mover's own grid cell and its eight surrounding
    /// cells — cheap enough for the cell sizes this engine expects, and the
    /// collision/border checks themselves only fire on actual overlap.
    fn neighbors_of(&self, mover_id: MoverId, hash: &HashMap<(i32, i32), Vec<MoverId>>) -> Vec<NeighborInfo> {
        let mover = &self.movers[mover_id.index()];
        let center = self.grid.cell_of(mover.position);
        let mut result = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(ids) = hash.get(&(center.0 + dx, center.1 + dy)) else { continue };
                for &other_id in ids {
                    if other_id == mover_id {
                        continue;
                    }
                    let other = &self.movers[other_id.index()];
                    result.push(NeighborInfo {
                        position: other.position,
                        dimension: other.dimension,
                        velocity: other.velocity,
                    });
                }
            }
        }
        result
    }

    /// Decide whether `movers[idx]` should replan this tick and, if so, run
    /// the pathfinder and smooth the result into its consumable path
    /// (§4.3). Replans when the path is empty, `reset` was requested, the
    /// mover has drifted at least one cell diagonal from its path head, or
    /// (throttled to once every `heatmap_check_interval_ticks`) the current
    /// cell *or* the next path cell's congestion exceeds `heatmap_threshold`
    /// — read after this mover's own contribution was already subtracted
    /// this tick, so a mover never sees its own weight as congestion.
    fn maybe_replan(&mut self, idx: usize, config: &EngineConfig) {
        let position = self.movers[idx].position;
        let destination = self.movers[idx].destination;
        let reset = self.movers[idx].reset;
        let path_head = self.movers[idx].path.front().copied();
        let path_empty = self.movers[idx].path.is_empty();

        let needs_distance_replan = match path_head {
            Some(head) => position.distance(head) >= self.grid.cell_diagonal(),
            None => true,
        };
        let mut should_replan = reset || needs_distance_replan;

        if !should_replan && !path_empty {
            self.mover_replan_throttle[idx] += 1;
            if self.mover_replan_throttle[idx] >= config.heatmap_check_interval_ticks {
                self.mover_replan_throttle[idx] = 0;
                let current_cell = self.grid.cell_of(position);
                let next_congested = match path_head {
                    Some(head) => self.grid.weight(self.grid.cell_of(head)) > config.heatmap_threshold,
                    None => false,
                };
                if self.grid.weight(current_cell) > config.heatmap_threshold || next_congested {
                    should_replan = true;
                }
            }
        }

        if !should_replan {
            return;
        }
        self.mover_replan_throttle[idx] = 0;

        let start = self.grid.cell_of(position);
        let goal = self.grid.cell_of(destination);
        let mover_id = self.movers[idx].id;

        match self.pathfinder.find_path(&self.graph, &self.grid, start, goal) {
            Ok(Some(cells)) => {
                let mut waypoints: Vec<Vec2> = Vec::with_capacity(cells.len() + 2);
                waypoints.push(position);
                waypoints.extend(cells.iter().map(|&c| self.grid.cell_center(c)));
                waypoints.push(destination);
                let smoothed = smooth_path(&waypoints, config.bezier_segments_per_corner);
                // Drop the first sample (the exact current position) — the
                // mover's path holds only waypoints still ahead of it.
                self.movers[idx].path = smoothed.into_iter().skip(1).collect();
                self.movers[idx].destination_unreachable = false;
            }
            Ok(None) => {
                warn!(mover = %mover_id, "pathfinder exhausted search without reaching the destination");
                self.movers[idx].destination_unreachable = true;
            }
            Err(err) => {
                warn!(mover = %mover_id, %err, "start or goal cell not in the navigable grid");
                self.movers[idx].destination_unreachable = true;
            }
        }
        self.movers[idx].reset = false;
    }

    /// `FullReset`: return every mover and producer to its initial
    /// blueprint pose. `hard` additionally clears cumulative counters and
    /// interaction history (§4.7, and the Open Question resolved in
    /// `DESIGN.md`).
    pub fn full_reset(&mut self, hard: bool) {
        self.grid.clear_weights();

        for (idx, initial) in self.initial_movers.iter().enumerate() {
            let distance = self.movers[idx].distance;
            let transport_count = self.movers[idx].transport_count;
            self.movers[idx] = initial.clone();
            if !hard {
                self.movers[idx].distance = distance;
                self.movers[idx].transport_count = transport_count;
            }
            let corners = self.movers[idx].corners();
            self.grid.add_footprint_weight(corners, self.movers[idx].cell_weight);
            self.mover_prev_corners[idx] = corners;
            self.mover_replan_throttle[idx] = 0;
        }

        for (idx, initial) in self.initial_producers.iter().enumerate() {
            let interaction_counter = self.producers[idx].interaction_counter.clone();
            let empty_queued_ticks = self.producers[idx].empty_queued_ticks;
            self.producers[idx] = initial.clone();
            if !hard {
                self.producers[idx].interaction_counter = interaction_counter;
                self.producers[idx].empty_queued_ticks = empty_queued_ticks;
            }
        }

        if hard {
            self.collision_count = 0;
        }
    }
}
