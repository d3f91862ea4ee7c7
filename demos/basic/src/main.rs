//! basic — smallest runnable demo of the smart-factory simulation engine.
//!
//! Two movers ferry a handful of `Trimmer` products across a single floor
//! to one producer that supports every step of the recipe, driven by the
//! in-process [`DummyBroker`] standing in for a real bidding broker.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use sf_broker::{channel_pair, DummyBroker};
use sf_core::{EngineConfig, Interaction, Vec2};
use sf_product::{CompletedRecord, ProductType};
use sf_sim::{BlueprintMover, BlueprintProducer, BlueprintSpec, Engine, EngineMetrics, EngineObserver, TickScheduler};

const PRODUCT_COUNT: usize = 6;
const RUN_SECONDS: u64 = 3;

/// Optional config overlay, the same shape an operator would ship next to
/// the binary (§6's configuration table) — merged over `EngineConfig::default()`.
const CONFIG_OVERLAY: &str = "\
broker_retry_count = 8\n\
broker_retry_interval_ms = 250\n\
";

#[derive(serde::Deserialize, Default)]
struct ConfigOverlay {
    broker_retry_count: Option<u32>,
    broker_retry_interval_ms: Option<u64>,
}

fn load_config() -> Result<EngineConfig> {
    let mut config = EngineConfig::default();
    let overlay: ConfigOverlay = toml::from_str(CONFIG_OVERLAY).context("parsing embedded config overlay")?;
    if let Some(v) = overlay.broker_retry_count {
        config.broker_retry_count = v;
    }
    if let Some(v) = overlay.broker_retry_interval_ms {
        config.broker_retry_interval = Duration::from_millis(v);
    }
    Ok(config)
}

fn build_blueprint() -> BlueprintSpec {
    let mut cost = HashMap::new();
    for interaction in [
        Interaction::PlaceHousing,
        Interaction::PlaceTrimmerElement,
        Interaction::PlaceLever,
        Interaction::RemoveAssy,
    ] {
        cost.insert(interaction, 15);
    }

    BlueprintSpec {
        floor_extent: Vec2::new(1_000.0, 600.0),
        cell_size: Vec2::new(25.0, 25.0),
        movers: vec![
            BlueprintMover {
                name: "mover_0".to_string(),
                position: Vec2::new(30.0, 30.0),
                dimension: Vec2::new(20.0, 20.0),
                cell_weight: 4,
            },
            BlueprintMover {
                name: "mover_1".to_string(),
                position: Vec2::new(30.0, 560.0),
                dimension: Vec2::new(20.0, 20.0),
                cell_weight: 4,
            },
        ],
        producers: vec![BlueprintProducer {
            name: "assembly_cell".to_string(),
            position: Vec2::new(900.0, 300.0),
            dimension: Vec2::new(60.0, 60.0),
            processer_position: Vec2::new(870.0, 300.0),
            interaction_cost: cost,
        }],
        borders: Vec::new(),
    }
}

/// Prints a line per completed product and a running tick counter, the
/// console-facing collaborator §1 leaves unopinionated.
struct ConsoleObserver {
    ticks_seen: u64,
}

impl EngineObserver for ConsoleObserver {
    fn on_tick(&mut self, metrics: EngineMetrics) {
        self.ticks_seen += 1;
        if self.ticks_seen % 120 == 0 {
            tracing::debug!(
                tick = %metrics.tick,
                in_progress = metrics.in_progress_products,
                completed = metrics.completed_products,
                collisions = metrics.collision_count,
                "tick summary"
            );
        }
    }

    fn on_collision(&mut self, mover: sf_core::MoverId) {
        tracing::warn!(?mover, "collision detected");
    }

    fn on_product_complete(&mut self, record: &CompletedRecord) {
        println!("  completed: {} (ticks={}, distance={:.1}mm)", record.name, record.ticks, record.distance);
    }

    fn on_complete_retry_exhausted(&mut self, unit: &str) {
        tracing::error!(unit, "complete handshake gave up");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("basic=info".parse()?))
        .init();

    println!("=== basic — smart-factory simulation engine demo ===");
    println!("Movers: 2  |  Producer: assembly_cell  |  Products: {PRODUCT_COUNT}x Trimmer");
    println!();

    // 1. Load config (embedded overlay merged over defaults).
    let config = load_config()?;

    // 2. Build the floor and wire the engine to an in-process dummy broker.
    let blueprint = build_blueprint();
    let (engine_end, broker_end) = channel_pair();
    let engine = Engine::new(&blueprint, config.clone(), Box::new(engine_end.outbound), engine_end.inbound)
        .context("building engine from blueprint")?;
    let broker = DummyBroker::new(Box::new(broker_end.outbound), broker_end.inbound);

    // 3. Run the ordered Create handshake: the dummy broker acknowledges on
    // a scoped thread while the engine drives the retried session (§4.10).
    let units = engine.create_payloads();
    println!("Creating {} units with the broker...", units.len());
    thread::scope(|scope| -> Result<()> {
        scope.spawn(|| {
            for _ in 0..units.len() {
                let _ = broker.try_ack_next_create(Duration::from_secs(2));
            }
        });
        engine.run_create_handshake().context("create handshake failed")
    })?;
    println!("All units created.");

    // 4. Seed the supervisor with a handful of in-progress products.
    let mut engine = engine;
    for _ in 0..PRODUCT_COUNT {
        engine.create_product(ProductType::Trimmer);
    }

    // 5. Hand the engine and broker to the tick scheduler (C8): three
    // background threads (update/render/counter), starting paused.
    let engine = Arc::new(Mutex::new(engine));
    let broker = Arc::new(Mutex::new(broker));
    let observer = Arc::new(Mutex::new(ConsoleObserver { ticks_seen: 0 }));

    let scheduler = {
        let engine = Arc::clone(&engine);
        let broker = Arc::clone(&broker);
        let observer = Arc::clone(&observer);
        TickScheduler::start(
            config.clone(),
            move |_tick| {
                let mut engine = engine.lock().expect("engine mutex poisoned");
                let mut broker = broker.lock().expect("broker mutex poisoned");
                for step in engine.pending_dispatches() {
                    broker.enqueue(step);
                }
                let mut observer = observer.lock().expect("observer mutex poisoned");
                engine.tick(&mut *observer);
                let _ = broker.drive();
            },
            || {},
        )
    };

    scheduler.resume();
    println!("Running for {RUN_SECONDS}s at {} ups...", config.target_ups);
    thread::sleep(Duration::from_secs(RUN_SECONDS));

    let completed_at_stop = engine.lock().expect("engine mutex poisoned").supervisor().completed_count();
    scheduler.stop_and_join();

    // 6. Shut down the bidding session and print a summary.
    let mut engine = Arc::try_unwrap(engine)
        .map_err(|_| anyhow::anyhow!("engine still shared after scheduler join"))?
        .into_inner()
        .expect("engine mutex poisoned");
    engine.shutdown();

    println!();
    println!("Simulation stopped at tick {}.", engine.current_tick());
    println!("Products completed: {completed_at_stop}/{PRODUCT_COUNT}");
    println!("Collisions recorded: {}", engine.registry().collision_count());
    println!();

    println!("{:<14} {:<18} {:<10}", "Product", "Ticks", "Distance (mm)");
    println!("{}", "-".repeat(44));
    for record in engine.supervisor().completed_snapshot() {
        println!("{:<14} {:<18} {:<10.1}", record.name, record.ticks, record.distance);
    }

    Ok(())
}
