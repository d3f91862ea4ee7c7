//! Unit tests for the Mover and Producer models.

use sf_core::geo::Segment;
use sf_core::{Interaction, MoverId, ProducerId, ProductId, Vec2};
use sf_navigation::context::NeighborInfo;

use crate::mover::Mover;
use crate::producer::{Producer, ProcessingPhase};
use crate::unit::UnitState;

fn mover_at(x: f32, y: f32) -> Mover {
    Mover::new(MoverId(0), Vec2::new(x, y), Vec2::new(5.0, 5.0))
}

#[test]
fn disabled_forces_blocked_and_clears_path() {
    let mut m = mover_at(0.0, 0.0);
    m.path.push_back(Vec2::new(10.0, 10.0));
    m.set_disabled(true);
    assert_eq!(m.state, UnitState::Blocked);
    assert!(m.path.is_empty());
}

#[test]
fn is_blocked_true_when_surrounded_by_borders() {
    let m = mover_at(0.0, 0.0);
    // Borders on all four sides, close enough to be hit by the probe step.
    let step = Mover::MAX_SPEED * 5.0;
    let borders = vec![
        Segment::new(Vec2::new(-step - 100.0, step + 2.5), Vec2::new(step + 100.0, step + 2.5)),
        Segment::new(Vec2::new(-step - 100.0, -step - 2.5), Vec2::new(step + 100.0, -step - 2.5)),
        Segment::new(Vec2::new(step + 2.5, -step - 100.0), Vec2::new(step + 2.5, step + 100.0)),
        Segment::new(Vec2::new(-step - 2.5, -step - 100.0), Vec2::new(-step - 2.5, step + 100.0)),
    ];
    let neighbors: Vec<NeighborInfo> = vec![];
    assert!(m.is_blocked(&neighbors, &borders, 3, 5.0));
}

#[test]
fn is_blocked_false_in_open_space() {
    let m = mover_at(0.0, 0.0);
    assert!(!m.is_blocked(&[], &[], 3, 5.0));
}

#[test]
fn collision_counts_once_per_cooldown_episode() {
    let mut m = mover_at(0.0, 0.0);
    assert!(m.on_collision(30));
    assert!(!m.on_collision(30));
    for _ in 0..30 {
        m.tick_cooldown();
    }
    assert!(m.on_collision(30));
}

#[test]
fn transport_cost_is_manhattan_distance() {
    let m = mover_at(0.0, 0.0);
    let cost = m.transport_cost(Vec2::new(3.0, 4.0));
    assert_eq!(cost, 7.0);
}

#[test]
fn start_transport_sets_destination_and_reset_flag() {
    let mut m = mover_at(0.0, 0.0);
    m.start_transport(Vec2::new(100.0, 0.0), ProductId(1));
    assert_eq!(m.destination, Vec2::new(100.0, 0.0));
    assert!(m.reset);
    assert_eq!(m.service_requester, Some(ProductId(1)));
}

fn producer_at(x: f32, y: f32) -> Producer {
    Producer::new(ProducerId(0), Vec2::new(x, y), Vec2::new(10.0, 10.0), Vec2::new(x, y))
}

#[test]
fn producer_phase_tracks_queue_and_binding() {
    let mut p = producer_at(0.0, 0.0);
    assert_eq!(p.phase(), ProcessingPhase::Idle);
    p.enqueue(MoverId(0));
    assert_eq!(p.phase(), ProcessingPhase::Queued);
    p.interaction_cost.insert(Interaction::PlaceHousing, 5);
    let cost = p.cost_query(Interaction::PlaceHousing);
    p.start_processing(Interaction::PlaceHousing, cost).unwrap();
    assert_eq!(p.phase(), ProcessingPhase::Processing);
}

#[test]
fn zero_cost_interaction_completes_without_binding() {
    let mut p = producer_at(0.0, 0.0);
    p.enqueue(MoverId(0));
    let completed = p.start_processing(Interaction::SpecialTrick, 0).unwrap();
    assert_eq!(completed, Some(MoverId(0)));
    assert_eq!(p.phase(), ProcessingPhase::Idle);
    assert_eq!(p.processing_countdown, 0);
}

#[test]
fn processing_countdown_invariant_holds_across_ticks() {
    let mut p = producer_at(0.0, 0.0);
    p.enqueue(MoverId(0));
    p.start_processing(Interaction::PlaceHousing, 3).unwrap();
    for _ in 0..2 {
        assert!(p.tick().is_none());
        assert!(p.processing_countdown > 0);
        assert!(p.service_requester.is_some());
    }
    let completed = p.tick();
    assert_eq!(completed, Some(MoverId(0)));
    assert!(p.service_requester.is_none());
    assert_eq!(p.processing_countdown, 0);
}

#[test]
fn toggle_state_bails_entire_queue() {
    let mut p = producer_at(0.0, 0.0);
    p.enqueue(MoverId(0));
    p.enqueue(MoverId(1));
    p.enqueue(MoverId(2));
    let bailed = p.toggle_state();
    assert_eq!(bailed, vec![MoverId(0), MoverId(1), MoverId(2)]);
    assert_eq!(p.state, UnitState::Blocked);
    assert!(p.queue.is_empty());
}

#[test]
fn start_processing_rejected_while_blocked() {
    let mut p = producer_at(0.0, 0.0);
    p.enqueue(MoverId(0));
    p.toggle_state();
    assert!(p.start_processing(Interaction::PlaceHousing, 5).is_err());
}

#[test]
fn non_transport_cost_query_defaults_to_zero() {
    let p = producer_at(0.0, 0.0);
    assert_eq!(p.cost_query(Interaction::RemoveAssy), 0);
}
