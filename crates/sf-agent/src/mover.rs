//! Mover model (component C5): kinematics, blocked/free-direction probing,
//! collision cooldown bookkeeping, and the transport task lifecycle.

use std::collections::VecDeque;

use sf_core::geo::{sat_overlap, segment_intersects_rect, Segment};
use sf_core::{MoverId, ProductId, Rect, Vec2};
use sf_navigation::context::NeighborInfo;
use sf_navigation::steering::SteeringOutput;

use crate::unit::{Direction, UnitState};

/// Result of `get_free_directions`: which of the four cardinal directions
/// are currently unobstructed at the tested distance.
#[derive(Copy, Clone, Debug, Default)]
pub struct CardinalSet {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl CardinalSet {
    pub fn get(&self, dir: Direction) -> bool {
        match dir {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }

    fn set(&mut self, dir: Direction, value: bool) {
        match dir {
            Direction::North => self.north = value,
            Direction::South => self.south = value,
            Direction::East => self.east = value,
            Direction::West => self.west = value,
        }
    }

    pub fn blocked_count(&self) -> u32 {
        [self.north, self.south, self.east, self.west]
            .iter()
            .filter(|free| !**free)
            .count() as u32
    }
}

/// Autonomous rectangular transport agent.
///
/// `max_speed`/`max_force` are fixed per the data model (§3) rather than
/// per-instance tunables — every mover in the fleet shares the same
/// kinematic limits.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mover {
    pub id: MoverId,
    pub state: UnitState,
    pub position: Vec2,
    pub dimension: Vec2,
    pub acceleration: Vec2,
    pub velocity: Vec2,
    pub destination: Vec2,
    pub swap_destination: Option<Vec2>,
    pub destination_unreachable: bool,
    /// Set so the next `navigate` call discards any stale path instead of
    /// trying to resume it (§4.5: set by `StartTransport`).
    pub reset: bool,
    /// Front of the deque is the next waypoint to seek; consumed front-first.
    pub path: VecDeque<Vec2>,
    /// Congestion contribution this mover adds to any cell its footprint
    /// touches (§4.2).
    pub cell_weight: u32,
    /// Cooldown counter: while non-zero, a new SAT overlap does not bump the
    /// collision counter again (§4.5).
    pub collided: u32,
    pub distance: f32,
    pub transport_count: u32,
    pub service_requester: Option<ProductId>,
    pub disabled: bool,
}

impl Mover {
    pub const MAX_SPEED: f32 = 2.0;
    pub const MAX_FORCE: f32 = 0.6;

    pub fn new(id: MoverId, position: Vec2, dimension: Vec2) -> Self {
        Self {
            id,
            state: UnitState::Alive,
            position,
            dimension,
            acceleration: Vec2::ZERO,
            velocity: Vec2::ZERO,
            destination: position,
            swap_destination: None,
            destination_unreachable: false,
            reset: false,
            path: VecDeque::new(),
            cell_weight: 4,
            collided: 0,
            distance: 0.0,
            transport_count: 0,
            service_requester: None,
            disabled: false,
        }
    }

    #[inline]
    pub fn footprint(&self) -> Rect {
        Rect::new(self.position, self.dimension)
    }

    /// The four corners of the footprint, for heatmap weight contribution.
    #[inline]
    pub fn corners(&self) -> [Vec2; 4] {
        self.footprint().corners()
    }

    /// The waypoint steering should currently seek: the head of `path` if
    /// present, else `destination` (§4.4 seek-and-arrive).
    pub fn seek_target(&self) -> Option<Vec2> {
        self.path.front().copied().or(Some(self.destination))
    }

    /// `disabled` forces `state = Blocked` and clears any path (§3 invariant).
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.state = UnitState::Blocked;
            self.path.clear();
        }
    }

    /// `IsBlocked`: probe the four cardinal directions at `step =
    /// max_speed * multiplier` and report `true` once at least `count` of
    /// them are obstructed (§4.5).
    pub fn is_blocked(
        &self,
        neighbors: &[NeighborInfo],
        borders: &[Segment],
        count: u32,
        multiplier: f32,
    ) -> bool {
        let step = Self::MAX_SPEED * multiplier;
        self.get_free_directions(neighbors, borders, step)
            .blocked_count()
            >= count
    }

    /// `GetFreeDirections`: probe each cardinal direction at
    /// `test_distance` and report which are unobstructed.
    pub fn get_free_directions(
        &self,
        neighbors: &[NeighborInfo],
        borders: &[Segment],
        test_distance: f32,
    ) -> CardinalSet {
        let mut result = CardinalSet::default();
        for dir in Direction::ALL {
            let stepped = Rect::new(
                self.position + dir.unit_vector() * test_distance,
                self.dimension,
            );
            let obstructed = borders.iter().any(|b| segment_intersects_rect(*b, stepped))
                || neighbors.iter().any(|n| sat_overlap(stepped, n.footprint()));
            result.set(dir, !obstructed);
        }
        result
    }

    /// Record a collision episode if the cooldown has elapsed, arming a new
    /// cooldown of `cooldown_ticks`. Returns `true` exactly when the caller
    /// should bump the global collision counter — once per episode, not
    /// once per overlapping tick (§4.5).
    pub fn on_collision(&mut self, cooldown_ticks: u32) -> bool {
        if self.collided == 0 {
            self.collided = cooldown_ticks;
            true
        } else {
            false
        }
    }

    /// Decrement the collision cooldown by one tick, saturating at zero.
    pub fn tick_cooldown(&mut self) {
        self.collided = self.collided.saturating_sub(1);
    }

    /// Cost query for the `Transport` interaction: Manhattan distance from
    /// this mover's center to the target producer's processer position
    /// (§4.5). Non-`Transport` interactions are the producer's concern.
    pub fn transport_cost(&self, producer_processer_position: Vec2) -> f32 {
        self.position.manhattan_distance(producer_processer_position)
    }

    /// `StartTransport`: begin heading for `producer_processer_position` on
    /// behalf of `requester` (§4.5).
    pub fn start_transport(&mut self, producer_processer_position: Vec2, requester: ProductId) {
        self.destination = producer_processer_position;
        self.service_requester = Some(requester);
        self.reset = true;
    }

    /// `true` once this mover's center is within `arrival_radius` of its
    /// destination.
    pub fn has_arrived(&self, arrival_radius: f32) -> bool {
        self.position.distance(self.destination) <= arrival_radius
    }

    /// Complete the current transport: increments `transport_count`, clears
    /// the bound requester. The caller is responsible for firing `Complete`
    /// to the broker.
    pub fn complete_transport(&mut self) -> Option<ProductId> {
        self.transport_count += 1;
        self.service_requester.take()
    }

    /// Drop the path's head waypoint once the mover is within
    /// `arrival_radius` of it, so the next tick seeks the following one.
    pub fn advance_path(&mut self, arrival_radius: f32) {
        if let Some(&head) = self.path.front() {
            if self.position.distance(head) <= arrival_radius {
                self.path.pop_front();
            }
        }
    }

    /// Apply one tick's steering result: update kinematic state and
    /// accumulate distance traveled.
    pub fn apply_steering(&mut self, out: &SteeringOutput) {
        self.distance += out.position.distance(self.position);
        self.acceleration = out.acceleration;
        self.velocity = out.velocity;
        self.position = out.position;
    }
}
