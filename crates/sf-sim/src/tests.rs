//! End-to-end scenario tests: an `Engine` wired to a bus endpoint, driven
//! tick by tick, exercising the scenarios spec.md §8 calls out explicitly.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use sf_broker::{channel_pair, BusMessage, DummyBroker, MessageBus, PerformPayload};
use sf_core::geo::Segment;
use sf_core::{EngineConfig, Interaction, MoverId, ProducerId, ProductId, Vec2};
use sf_product::ProductType;

use crate::engine::Engine;
use crate::events::TickEvent;
use crate::observer::{EngineObserver, NoopObserver};
use crate::registry::{BlueprintMover, BlueprintProducer, BlueprintSpec, Registry};

fn test_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.broker_retry_count = 5;
    config.broker_retry_interval = Duration::from_millis(15);
    config
}

fn single_leg_blueprint(interaction_cost: HashMap<Interaction, u32>) -> BlueprintSpec {
    BlueprintSpec {
        floor_extent: Vec2::new(500.0, 500.0),
        cell_size: Vec2::new(25.0, 25.0),
        movers: vec![BlueprintMover {
            name: "mover_0".to_string(),
            position: Vec2::new(12.0, 12.0),
            dimension: Vec2::new(10.0, 10.0),
            cell_weight: 4,
        }],
        producers: vec![BlueprintProducer {
            name: "producer_0".to_string(),
            position: Vec2::new(200.0, 200.0),
            dimension: Vec2::new(20.0, 20.0),
            processer_position: Vec2::new(200.0, 200.0),
            interaction_cost,
        }],
        borders: Vec::new(),
    }
}

/// Runs the ordered Create handshake against a `DummyBroker` on a scoped
/// thread, then hands back a wired engine ready to tick (§4.10).
fn spawn_engine(blueprint: &BlueprintSpec, config: EngineConfig) -> (Engine, DummyBroker) {
    let (engine_end, broker_end) = channel_pair();
    let engine = Engine::new(blueprint, config, Box::new(engine_end.outbound), engine_end.inbound)
        .expect("test blueprint should validate");
    let broker = DummyBroker::new(Box::new(broker_end.outbound), broker_end.inbound);

    let units = engine.create_payloads();
    thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..units.len() {
                let _ = broker.try_ack_next_create(Duration::from_secs(1));
            }
        });
        engine.run_create_handshake().expect("create handshake should succeed");
    });

    (engine, broker)
}

/// Drive `engine`/`broker` together for up to `max_ticks`, feeding every
/// tick's pending dispatches into the broker's FIFO, stopping early once
/// `done` reports true.
fn drive_until(engine: &mut Engine, broker: &mut DummyBroker, max_ticks: u32, mut done: impl FnMut(&Engine) -> bool) {
    let mut observer = NoopObserver;
    for _ in 0..max_ticks {
        for step in engine.pending_dispatches() {
            broker.enqueue(step);
        }
        engine.tick(&mut observer);
        let _ = broker.drive();
        if done(engine) {
            return;
        }
    }
}

#[test]
fn trimmer_recipe_completes_end_to_end() {
    let mut cost = HashMap::new();
    for interaction in [
        Interaction::PlaceHousing,
        Interaction::PlaceTrimmerElement,
        Interaction::PlaceLever,
        Interaction::RemoveAssy,
    ] {
        cost.insert(interaction, 2);
    }
    let blueprint = single_leg_blueprint(cost);
    let (mut engine, mut broker) = spawn_engine(&blueprint, test_config());

    let product = engine.create_product(ProductType::Trimmer);
    drive_until(&mut engine, &mut broker, 20_000, |e| e.supervisor().completed_count() > 0);

    assert_eq!(engine.supervisor().completed_count(), 1, "product should finish all four recipe steps");
    assert_eq!(engine.supervisor().in_progress_count(), 0);
    let completed = engine.supervisor().completed_snapshot();
    assert_eq!(completed[0].completed_interactions.len(), 4);
    let _ = product;
}

#[test]
fn complete_handshake_exhausts_retry_budget_without_crashing() {
    // Act as the broker by hand so the Transport leg's Create/RequestCost/
    // Perform steps succeed normally but no `CompleteAck` is ever sent —
    // the engine's retry budget for that handshake must exhaust and drop
    // the product non-fatally (§4.10/§7), rather than blocking forever.
    let mut cost = HashMap::new();
    cost.insert(Interaction::PlaceHousing, 0);
    let blueprint = single_leg_blueprint(cost);
    let mut config = test_config();
    config.broker_retry_count = 3;
    config.broker_retry_interval = Duration::from_millis(10);

    let (engine_end, broker_end) = channel_pair();
    let mut engine = Engine::new(&blueprint, config, Box::new(engine_end.outbound), engine_end.inbound)
        .expect("test blueprint should validate");

    let units = engine.create_payloads();
    thread::scope(|scope| {
        scope.spawn(|| {
            for unit in &units {
                loop {
                    match broker_end.inbound.recv_timeout(Duration::from_secs(1)) {
                        Ok(BusMessage::Create(payload)) if payload.name == unit.name => {
                            let _ = broker_end.outbound.publish(BusMessage::CreateAck(
                                sf_broker::AcknowledgePayload { name: payload.name },
                            ));
                            break;
                        }
                        Ok(_) | Err(_) => continue,
                    }
                }
            }
        });
        engine.run_create_handshake().expect("create handshake should succeed");
    });

    let product = engine.create_product(ProductType::Trimmer);
    let product_name = engine.supervisor().get(product).unwrap().name.clone();

    struct RecordingObserver {
        exhausted: Vec<String>,
    }
    impl EngineObserver for RecordingObserver {
        fn on_complete_retry_exhausted(&mut self, unit: &str) {
            self.exhausted.push(unit.to_string());
        }
    }
    let mut observer = RecordingObserver { exhausted: Vec::new() };

    // Stand in for the broker by hand: open the Transport leg with a
    // `RequestCost`, answer the `Perform` it gets back, then swallow every
    // `Complete` so it's never acknowledged.
    thread::scope(|scope| {
        scope.spawn(|| {
            let _ = broker_end.outbound.publish(BusMessage::RequestCost {
                unit: "mover_0".to_string(),
                payload: sf_broker::RequestCostPayload {
                    service_requester: product_name.clone(),
                    interaction_element: Interaction::Transport.to_url().to_string(),
                    destination: Some("producer_0".to_string()),
                },
            });
            for _ in 0..200 {
                match broker_end.inbound.recv_timeout(Duration::from_millis(50)) {
                    Ok(BusMessage::ResponseCost { unit, .. }) => {
                        let _ = broker_end.outbound.publish(BusMessage::Perform {
                            unit,
                            payload: PerformPayload {
                                interaction_element: Interaction::Transport.to_url().to_string(),
                                destination: Some("producer_0".to_string()),
                            },
                        });
                    }
                    Ok(BusMessage::Complete { .. }) => {
                        // Deliberately unanswered.
                    }
                    _ => {}
                }
            }
        });

        for _ in 0..500 {
            engine.tick(&mut observer);
            if !observer.exhausted.is_empty() {
                break;
            }
        }
    });

    assert_eq!(observer.exhausted, vec!["mover_0".to_string()]);
    assert_eq!(engine.supervisor().in_progress_count(), 1, "exhaustion is logged, not fatal");
}

#[test]
fn full_reset_returns_units_to_blueprint_pose() {
    let mut cost = HashMap::new();
    cost.insert(Interaction::PlaceHousing, 0);
    let blueprint = single_leg_blueprint(cost);
    let (mut engine, _broker) = spawn_engine(&blueprint, test_config());

    engine.create_product(ProductType::Trimmer);
    engine.reset(true);

    assert_eq!(engine.supervisor().in_progress_count(), 0, "hard reset clears the product supervisor too");
    let mover = engine.registry().mover(MoverId(0)).unwrap();
    assert_eq!(mover.position, blueprint.movers[0].position);
}

#[test]
fn toggle_producer_flips_alive_to_blocked() {
    let mut cost = HashMap::new();
    cost.insert(Interaction::PlaceHousing, 0);
    let blueprint = single_leg_blueprint(cost);
    let (mut engine, _broker) = spawn_engine(&blueprint, test_config());

    engine.toggle_producer(ProducerId(0));
    let producer = engine.registry().producer(ProducerId(0)).unwrap();
    assert!(producer.state != sf_agent::UnitState::Alive);
}

#[test]
fn producer_toggle_mid_queue_bails_every_queued_mover() {
    // §8 scenario 6: queue holds movers A, B, C when the producer becomes
    // Blocked. Expected: `ProductionBailed` for all three, the queue is
    // emptied, and no further `StartProcessing` is accepted while Blocked.
    let blueprint = BlueprintSpec {
        floor_extent: Vec2::new(500.0, 500.0),
        cell_size: Vec2::new(25.0, 25.0),
        movers: vec![
            BlueprintMover {
                name: "mover_a".to_string(),
                position: Vec2::new(10.0, 10.0),
                dimension: Vec2::new(10.0, 10.0),
                cell_weight: 4,
            },
            BlueprintMover {
                name: "mover_b".to_string(),
                position: Vec2::new(30.0, 10.0),
                dimension: Vec2::new(10.0, 10.0),
                cell_weight: 4,
            },
            BlueprintMover {
                name: "mover_c".to_string(),
                position: Vec2::new(50.0, 10.0),
                dimension: Vec2::new(10.0, 10.0),
                cell_weight: 4,
            },
        ],
        producers: vec![BlueprintProducer {
            name: "producer_0".to_string(),
            position: Vec2::new(200.0, 200.0),
            dimension: Vec2::new(20.0, 20.0),
            processer_position: Vec2::new(200.0, 200.0),
            interaction_cost: HashMap::new(),
        }],
        borders: Vec::new(),
    };

    let mut registry = Registry::from_blueprint(&blueprint, &test_config());
    let producer = registry.find_producer_by_name("producer_0").unwrap();
    let mover_a = registry.find_mover_by_name("mover_a").unwrap();
    let mover_b = registry.find_mover_by_name("mover_b").unwrap();
    let mover_c = registry.find_mover_by_name("mover_c").unwrap();

    registry.enqueue_producer(producer, mover_a);
    registry.enqueue_producer(producer, mover_b);
    registry.enqueue_producer(producer, mover_c);

    let events = registry.toggle_producer_state(producer);
    let bailed: Vec<MoverId> = events
        .into_iter()
        .map(|event| match event {
            TickEvent::ProductionBailed { mover, .. } => mover,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(bailed, vec![mover_a, mover_b, mover_c]);

    let p = registry.producer(producer).unwrap();
    assert!(p.queue.is_empty());
    assert_eq!(p.state, sf_agent::UnitState::Blocked);

    assert!(registry.start_processing(producer, Interaction::PlaceHousing, 5).unwrap().is_err());
}

#[test]
fn head_on_movers_between_borders_bail_out_safely() {
    // §8 scenario 3: two movers placed head-to-head between borders so
    // `IsBlocked` returns true for >=3 directions on both. Expected: both
    // halt without crashing and the collision counter stays bounded by the
    // cooldown window rather than incrementing every tick.
    let config = test_config();
    let blueprint = BlueprintSpec {
        floor_extent: Vec2::new(200.0, 100.0),
        cell_size: Vec2::new(25.0, 25.0),
        movers: vec![
            BlueprintMover {
                name: "mover_a".to_string(),
                position: Vec2::new(20.0, 50.0),
                dimension: Vec2::new(10.0, 10.0),
                cell_weight: 4,
            },
            BlueprintMover {
                name: "mover_b".to_string(),
                position: Vec2::new(28.0, 50.0),
                dimension: Vec2::new(10.0, 10.0),
                cell_weight: 4,
            },
        ],
        producers: Vec::new(),
        borders: vec![
            Segment::new(Vec2::new(0.0, 45.0), Vec2::new(100.0, 45.0)),
            Segment::new(Vec2::new(0.0, 55.0), Vec2::new(100.0, 55.0)),
            Segment::new(Vec2::new(14.0, 40.0), Vec2::new(14.0, 60.0)),
            Segment::new(Vec2::new(34.0, 40.0), Vec2::new(34.0, 60.0)),
        ],
    };

    let mut registry = Registry::from_blueprint(&blueprint, &config);
    let mover_a = registry.find_mover_by_name("mover_a").unwrap();
    let mover_b = registry.find_mover_by_name("mover_b").unwrap();
    registry.mover_mut(mover_a).unwrap().start_transport(Vec2::new(34.0, 50.0), ProductId(0));
    registry.mover_mut(mover_b).unwrap().start_transport(Vec2::new(14.0, 50.0), ProductId(1));

    let mut collisions = 0u64;
    for _ in 0..600 {
        let events = registry.step(&config);
        collisions += events.iter().filter(|e| matches!(e, TickEvent::CollisionDetected { .. })).count() as u64;
    }

    assert!(collisions >= 1, "overlapping head-on movers must register at least one collision");
    assert!(
        collisions <= 600 / u64::from(config.collision_cooldown_ticks) + 2,
        "collision counter must stay bounded by the cooldown window, collisions={collisions}"
    );
    for mover in [mover_a, mover_b] {
        let velocity = registry.mover(mover).unwrap().velocity;
        assert!(
            velocity.length() <= sf_agent::Mover::MAX_SPEED + 1e-3,
            "velocity must never exceed max_speed"
        );
    }
}

#[test]
fn shutdown_is_idempotent() {
    let mut cost = HashMap::new();
    cost.insert(Interaction::PlaceHousing, 0);
    let blueprint = single_leg_blueprint(cost);
    let (mut engine, _broker) = spawn_engine(&blueprint, test_config());
    engine.shutdown();
    engine.shutdown();
    assert!(engine.is_shutdown());
}
