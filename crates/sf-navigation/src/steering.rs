//! Steering composite (component C4): border repulsion, immediate-collision
//! resolution, predictive avoidance, and seek-and-arrive, combined by a
//! strict on/off priority rather than a weighted blend.

use sf_core::geo::{sat_overlap, segment_intersects_rect};
use sf_core::Vec2;

use crate::context::NavigationContext;

/// Radius (as a fraction of the remaining distance to the seek target)
/// inside which seek-and-arrive starts damping speed.
const ARRIVE_DAMPING_FACTOR: f32 = 3.0;

/// Everything `steer` needs about the agent itself for this tick.
pub struct SteeringInput {
    pub position: Vec2,
    pub velocity: Vec2,
    pub dimension: Vec2,
    pub max_speed: f32,
    pub max_force: f32,
    pub arrival_radius: f32,
    /// The head of the agent's path, or its destination if the path is
    /// empty — whichever seek-and-arrive should pursue this tick.
    pub seek_target: Option<Vec2>,
}

/// Result of one steering tick: the new kinematic state plus which
/// sub-behavior won priority, for observability/testing.
#[derive(Debug, Clone, Copy)]
pub struct SteeringOutput {
    pub acceleration: Vec2,
    pub velocity: Vec2,
    pub position: Vec2,
    pub border_active: bool,
    pub collision_active: bool,
    pub predictive_active: bool,
    pub seek_active: bool,
}

fn footprint(input: &SteeringInput) -> sf_core::Rect {
    sf_core::Rect::new(input.position, input.dimension)
}

/// Border repulsion: push away from any static border segment the agent's
/// footprint currently penetrates.
fn border_repulsion(input: &SteeringInput, ctx: &NavigationContext) -> Option<Vec2> {
    let rect = footprint(input);
    let mut push = Vec2::ZERO;
    let mut active = false;
    for seg in ctx.borders {
        if segment_intersects_rect(*seg, rect) {
            active = true;
            let mid = Vec2::new((seg.a.x + seg.b.x) * 0.5, (seg.a.y + seg.b.y) * 0.5);
            push += (input.position - mid).normalized();
        }
    }
    active.then_some(push.normalized() * input.max_force)
}

/// Immediate collision: push away from any neighbor currently overlapping
/// under SAT.
fn immediate_collision(input: &SteeringInput, ctx: &NavigationContext) -> Option<Vec2> {
    let rect = footprint(input);
    let mut push = Vec2::ZERO;
    let mut active = false;
    for neighbor in ctx.neighbors {
        if sat_overlap(rect, neighbor.footprint()) {
            active = true;
            push += (input.position - neighbor.position).normalized();
        }
    }
    active.then_some(push.normalized() * input.max_force)
}

/// Predictive avoidance: extrapolate the agent and every neighbor one tick
/// ahead and steer away from any predicted overlap.
fn predictive_avoidance(input: &SteeringInput, ctx: &NavigationContext) -> Option<Vec2> {
    let predicted_self = sf_core::Rect::new(input.position + input.velocity, input.dimension);
    let mut push = Vec2::ZERO;
    let mut active = false;
    for neighbor in ctx.neighbors {
        if sat_overlap(predicted_self, neighbor.predicted_footprint()) {
            active = true;
            push += (input.position - neighbor.position).normalized();
        }
    }
    active.then_some(push.normalized() * input.max_force)
}

/// Seek-and-arrive: seek the target, damping speed inside a braking radius
/// proportional to `arrival_radius` so the agent settles rather than
/// overshooting.
fn seek_arrive(input: &SteeringInput) -> Option<Vec2> {
    let target = input.seek_target?;
    let to_target = target - input.position;
    let distance = to_target.length();
    let braking_radius = input.arrival_radius * ARRIVE_DAMPING_FACTOR;

    let desired_speed = if distance < braking_radius {
        input.max_speed * (distance / braking_radius).clamp(0.0, 1.0)
    } else {
        input.max_speed
    };

    let desired_velocity = to_target.normalized() * desired_speed;
    Some((desired_velocity - input.velocity).clamp_length(input.max_force))
}

/// Run the full composite for one tick and integrate the resulting
/// kinematic state.
///
/// Priority: border > collision > predictive (only if border and collision
/// are both inactive) > seek (only if all three above are inactive). At
/// most one sub-behavior contributes force on a given tick.
pub fn steer(input: &SteeringInput, ctx: &NavigationContext) -> SteeringOutput {
    let border_force = border_repulsion(input, ctx);
    let collision_force = immediate_collision(input, ctx);
    let predictive_force = if border_force.is_none() && collision_force.is_none() {
        predictive_avoidance(input, ctx)
    } else {
        None
    };
    let seek_force =
        if border_force.is_none() && collision_force.is_none() && predictive_force.is_none() {
            seek_arrive(input)
        } else {
            None
        };

    let acceleration = border_force
        .or(collision_force)
        .or(predictive_force)
        .or(seek_force)
        .unwrap_or(Vec2::ZERO)
        .clamp_length(input.max_force);

    let mut velocity = input.velocity + acceleration;
    velocity = velocity.clamp_length(input.max_speed);
    let position = input.position + velocity;

    SteeringOutput {
        acceleration,
        velocity,
        position,
        border_active: border_force.is_some(),
        collision_active: collision_force.is_some(),
        predictive_active: predictive_force.is_some(),
        seek_active: seek_force.is_some(),
    }
}
