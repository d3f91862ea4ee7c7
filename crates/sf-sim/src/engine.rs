//! `Engine` — the single dependency-injected entry point §9's Design Notes
//! calls for, replacing the source's Environment/UI/Cycle singletons.
//!
//! `Engine` owns the environment registry (C7) and the product supervisor
//! (C9), and is the engine-side endpoint of the bidding broker protocol
//! (C10): it answers `RequestCost`, binds units on `Perform`, and drives
//! retried `Complete` handshakes — against either the in-process
//! [`DummyBroker`](sf_broker::DummyBroker) or a real external broker, since
//! both speak the same [`MessageBus`] contract (§4.10, §9).
//!
//! What `Engine` does **not** own: the tick scheduler's threads (C8 lives in
//! [`crate::scheduler::TickScheduler`] and calls [`Engine::tick`] from the
//! outside), and the broker's own task-dispatch strategy (a real bidding
//! broker decides what to bid on; the in-process [`DummyBroker`] only runs
//! whatever [`Engine::pending_dispatches`] hands it, per §4.11's "simple
//! FIFO of outstanding product steps").

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use tracing::{error, warn};

use sf_broker::{
    BusMessage, CreatePayload, CreateSession, MessageBus, PendingStep, PerformPayload,
    RequestCostPayload, ResponseCostPayload, StateChangePayload,
};
use sf_core::{EngineClock, EngineConfig, Interaction, MoverId, ProducerId, ProductId, Tick};

use sf_agent::UnitState;
use sf_product::{CompletedRecord, ProductSupervisor, ProductType};

use crate::error::{SimError, SimResult};
use crate::events::TickEvent;
use crate::observer::{EngineMetrics, EngineObserver};
use crate::registry::{BlueprintSpec, Registry, UnitRef};

/// One broker `RequestCost` the engine has answered and is waiting to see
/// a matching `Perform` for, keyed by unit name.
struct PendingRequest {
    service_requester: String,
    interaction: Interaction,
    destination: Option<ProducerId>,
}

/// What a product's current recipe step is waiting on, tracked entirely by
/// the engine (neither the registry nor the supervisor know about broker
/// dispatch state — §3's ownership rule keeps them id-only).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ProductLeg {
    /// Needs a `Transport` leg dispatched to carry some mover to a producer
    /// that can perform the current recipe interaction.
    AwaitingTransport,
    /// A `Transport` leg is in flight for `(mover, producer)`.
    InTransport(MoverId, ProducerId),
    /// The mover has docked at `producer` and the production interaction
    /// still needs dispatching.
    AwaitingProduction(MoverId, ProducerId),
    /// The production interaction is in flight at `(mover, producer)`.
    InProduction(MoverId, ProducerId),
}

impl ProductLeg {
    /// The mover currently carrying this product, if any — `None` only
    /// while `AwaitingTransport`.
    fn active_mover(&self) -> Option<MoverId> {
        match self {
            ProductLeg::AwaitingTransport => None,
            ProductLeg::InTransport(mover, _)
            | ProductLeg::AwaitingProduction(mover, _)
            | ProductLeg::InProduction(mover, _) => Some(*mover),
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum CompleteKind {
    Transport { mover: MoverId },
    Production { mover: MoverId, producer: ProducerId },
}

/// One outstanding `Complete` handshake being retried (§4.10).
struct PendingComplete {
    unit: String,
    product: ProductId,
    kind: CompleteKind,
    attempts: u32,
    last_sent: Option<Instant>,
}

/// The engine facade: `Engine::new`, `Engine::tick`, `Engine::event`,
/// `Engine::render_snapshot`, `Engine::shutdown` (§9).
pub struct Engine {
    config: EngineConfig,
    clock: EngineClock,
    registry: Registry,
    supervisor: ProductSupervisor,

    bus: Box<dyn MessageBus>,
    inbound: crossbeam_channel::Receiver<BusMessage>,

    pending_requests: HashMap<String, PendingRequest>,
    pending_completes: Vec<PendingComplete>,
    product_leg: HashMap<ProductId, ProductLeg>,
    mover_target_producer: HashMap<MoverId, ProducerId>,
    dispatched: HashSet<ProductId>,
    /// Each carrying mover's `distance` reading as of the start of its
    /// current leg, so [`Engine::accumulate_product_progress`] can accrue
    /// only the distance traveled *for this product* (§4.9).
    mover_distance_baseline: HashMap<MoverId, f32>,

    purged: bool,
}

impl Engine {
    /// Build an engine over `blueprint`, wired to whatever sits on the
    /// other end of `bus`/`inbound` — a real broker adapter or a
    /// [`DummyBroker`](sf_broker::DummyBroker)'s connected endpoint (see
    /// [`sf_broker::channel_pair`]).
    ///
    /// Fails with [`SimError::Blueprint`] if `blueprint` is malformed (a
    /// duplicate unit name, or a non-positive dimension/extent) — these are
    /// caller mistakes the engine must refuse rather than silently build a
    /// registry with broken name lookups or an empty grid.
    pub fn new(
        blueprint: &BlueprintSpec,
        config: EngineConfig,
        bus: Box<dyn MessageBus>,
        inbound: crossbeam_channel::Receiver<BusMessage>,
    ) -> SimResult<Self> {
        validate_blueprint(blueprint)?;
        Ok(Self {
            registry: Registry::from_blueprint(blueprint, &config),
            config,
            clock: EngineClock::new(),
            supervisor: ProductSupervisor::new(),
            bus,
            inbound,
            pending_requests: HashMap::new(),
            pending_completes: Vec::new(),
            product_leg: HashMap::new(),
            mover_target_producer: HashMap::new(),
            dispatched: HashSet::new(),
            mover_distance_baseline: HashMap::new(),
            purged: false,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn supervisor(&self) -> &ProductSupervisor {
        &self.supervisor
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    // ── Startup: Create handshake (§4.10) ─────────────────────────────────

    /// Build the `Create` payload for every mover and producer in the
    /// registry, in registry order (movers first) — the strictly-ordered
    /// sequence `CreateSession::run` publishes one at a time (§4.10).
    pub fn create_payloads(&self) -> Vec<CreatePayload> {
        let mut out = Vec::with_capacity(self.registry.movers().len() + self.registry.producers().len());
        for mover in self.registry.movers() {
            let name = self.registry.mover_name(mover.id).unwrap_or_default().to_string();
            out.push(CreatePayload {
                name,
                location: [mover.position.x, mover.position.y],
                model: "mover".to_string(),
                interaction_elements: vec![Interaction::Transport.to_url().to_string()],
                state: state_name(mover.state),
            });
        }
        for producer in self.registry.producers() {
            let name = self.registry.producer_name(producer.id).unwrap_or_default().to_string();
            out.push(CreatePayload {
                name,
                location: [producer.position.x, producer.position.y],
                model: "producer".to_string(),
                interaction_elements: producer
                    .interaction_cost
                    .keys()
                    .map(|i| i.to_url().to_string())
                    .collect(),
                state: state_name(producer.state),
            });
        }
        out
    }

    /// Run the ordered, retried Create handshake (§4.10) against whatever
    /// is on the other end of this engine's bus/inbound. Fatal on the
    /// first unit whose retry budget is exhausted, per §7's escalation
    /// rule — the caller should purge and stop.
    pub fn run_create_handshake(&self) -> SimResult<()> {
        let units = self.create_payloads();
        let session = CreateSession::new(
            self.bus.as_ref(),
            &self.inbound,
            self.config.broker_retry_count,
            self.config.broker_retry_interval,
        );
        session.run(&units).map_err(|err| {
            error!(%err, "create handshake failed, purging bidding session");
            SimError::Broker(err)
        })
    }

    // ── Per-tick driving ───────────────────────────────────────────────────

    /// Advance the simulation by one tick: pump inbound broker messages,
    /// step the environment registry (producers before movers, §4.7), pump
    /// retried `Complete` handshakes, and notify `observer`.
    pub fn tick(&mut self, observer: &mut dyn EngineObserver) {
        self.clock.advance();
        self.pump_inbound(observer);

        let events = self.registry.step(&self.config);
        self.handle_tick_events(events, observer);
        self.accumulate_product_progress();

        self.pump_completes(observer);

        observer.on_tick(EngineMetrics {
            tick: self.clock.current_tick,
            collision_count: self.registry.collision_count(),
            in_progress_products: self.supervisor.in_progress_count(),
            completed_products: self.supervisor.completed_count(),
        });
    }

    fn pump_inbound(&mut self, observer: &mut dyn EngineObserver) {
        while let Ok(msg) = self.inbound.try_recv() {
            match msg {
                BusMessage::RequestCost { unit, payload } => self.handle_request_cost(unit, payload),
                BusMessage::Perform { unit, payload } => self.handle_perform(unit, payload),
                BusMessage::CompleteAck { unit } => self.handle_complete_ack(&unit, observer),
                BusMessage::CreateAck(_) => {}
                other => {
                    warn!(?other, "unexpected message on engine inbound during steady state");
                }
            }
        }
    }

    /// Accrue every in-progress product's `ticks`/`distance`/
    /// `processing_ticks` against its active leg, once per tick (§4.9) —
    /// this is what feeds `demos/basic`'s completed-product summary table.
    fn accumulate_product_progress(&mut self) {
        for (&product, leg) in self.product_leg.iter() {
            let Some(p) = self.supervisor.get_mut(product) else { continue };
            p.ticks += 1;
            if matches!(leg, ProductLeg::InProduction(..)) {
                p.processing_ticks += 1;
            }
            let Some(mover) = leg.active_mover() else { continue };
            let Some(current_distance) = self.registry.mover(mover).map(|m| m.distance) else { continue };
            let baseline = *self.mover_distance_baseline.entry(mover).or_insert(current_distance);
            p.distance += (current_distance - baseline).max(0.0);
            self.mover_distance_baseline.insert(mover, current_distance);
        }
    }

    fn handle_tick_events(&mut self, events: Vec<TickEvent>, observer: &mut dyn EngineObserver) {
        for event in events {
            match event {
                TickEvent::TransportArrived { mover, product } => {
                    if let Some(producer) = self.mover_target_producer.remove(&mover) {
                        self.registry.enqueue_producer(producer, mover);
                        self.product_leg.insert(product, ProductLeg::AwaitingProduction(mover, producer));
                        // The transport leg's own dispatch slot is done; let
                        // `pending_dispatches` issue the production leg next.
                        self.dispatched.remove(&product);
                        let name = self.registry.mover_name(mover).unwrap_or_default().to_string();
                        self.begin_complete(name, product, CompleteKind::Transport { mover });
                    } else {
                        warn!(?mover, "transport arrival with no tracked destination producer");
                    }
                }
                TickEvent::ProducerInteractionComplete { producer, mover } => {
                    if let Some(product) = self.product_for_producer(producer) {
                        let name = self.registry.producer_name(producer).unwrap_or_default().to_string();
                        self.begin_complete(name, product, CompleteKind::Production { mover, producer });
                    }
                }
                TickEvent::ProductionBailed { producer, mover } => {
                    self.release_mover_from(mover, producer);
                    observer.on_unit_blocked(Some(mover), None);
                }
                TickEvent::CollisionDetected { mover } => {
                    observer.on_collision(mover);
                }
            }
        }
    }

    fn product_for_producer(&self, producer: ProducerId) -> Option<ProductId> {
        self.product_leg.iter().find_map(|(&product, leg)| match leg {
            ProductLeg::InProduction(_, p) if *p == producer => Some(product),
            _ => None,
        })
    }

    // ── Broker message handlers ────────────────────────────────────────────

    fn handle_request_cost(&mut self, unit: String, payload: RequestCostPayload) {
        let Ok(interaction) = Interaction::from_url(&payload.interaction_element) else {
            warn!(url = %payload.interaction_element, "unknown interaction url in RequestCost");
            return;
        };
        let Some(unit_ref) = self.resolve_unit(&unit) else {
            warn!(%unit, "RequestCost for unknown unit");
            return;
        };
        let destination = payload
            .destination
            .as_deref()
            .and_then(|name| self.registry.find_producer_by_name(name));

        let cost = self.compute_cost(unit_ref, interaction, destination);
        // §9 Open Question: ResponseCost(cost=0) is suppressed, never published.
        if cost == 0 {
            return;
        }

        self.pending_requests.insert(
            unit.clone(),
            PendingRequest { service_requester: payload.service_requester, interaction, destination },
        );
        let _ = self.bus.publish(BusMessage::ResponseCost {
            unit,
            payload: ResponseCostPayload { cost: u64::from(cost) },
        });
    }

    fn compute_cost(&self, unit: UnitRef, interaction: Interaction, destination: Option<ProducerId>) -> u32 {
        match unit {
            UnitRef::Mover(mover_id) => {
                if interaction != Interaction::Transport {
                    return 0;
                }
                let Some(mover) = self.registry.mover(mover_id) else { return 0 };
                if mover.state != UnitState::Alive || mover.disabled {
                    return 0;
                }
                let Some(destination) = destination else { return 0 };
                self.registry
                    .transport_cost(mover_id, destination)
                    .map(|cost| cost.round().max(0.0) as u32)
                    .unwrap_or(0)
            }
            UnitRef::Producer(producer_id) => {
                let Some(producer) = self.registry.producer(producer_id) else { return 0 };
                if producer.state != UnitState::Alive {
                    return 0;
                }
                self.registry.interaction_cost(producer_id, interaction).unwrap_or(0)
            }
        }
    }

    fn handle_perform(&mut self, unit: String, _payload: PerformPayload) {
        let Some(pending) = self.pending_requests.remove(&unit) else {
            warn!(%unit, "Perform for a unit with no outstanding RequestCost");
            return;
        };
        let Some(product) = self.supervisor_find_by_name(&pending.service_requester) else {
            warn!(name = %pending.service_requester, "Perform for unknown product");
            return;
        };
        let Some(unit_ref) = self.resolve_unit(&unit) else {
            return;
        };

        match unit_ref {
            UnitRef::Mover(mover) => {
                let Some(destination) = pending.destination else {
                    warn!(%unit, "Transport Perform missing a destination");
                    return;
                };
                self.registry.start_transport(mover, destination, product);
                self.mover_target_producer.insert(mover, destination);
                self.product_leg.insert(product, ProductLeg::InTransport(mover, destination));
                let baseline = self.registry.mover(mover).map(|m| m.distance).unwrap_or(0.0);
                self.mover_distance_baseline.insert(mover, baseline);
            }
            UnitRef::Producer(producer) => {
                let cost = self.registry.interaction_cost(producer, pending.interaction).unwrap_or(0);
                match self.registry.start_processing(producer, pending.interaction, cost) {
                    Some(Ok(Some(mover))) => {
                        // Zero-cost interaction completes synchronously (§4.6).
                        let name = self.registry.producer_name(producer).unwrap_or_default().to_string();
                        self.product_leg.insert(product, ProductLeg::InProduction(mover, producer));
                        self.begin_complete(name, product, CompleteKind::Production { mover, producer });
                    }
                    Some(Ok(None)) => {
                        if let ProductLeg::AwaitingProduction(mover, _) =
                            self.product_leg.get(&product).copied().unwrap_or(ProductLeg::AwaitingTransport)
                        {
                            self.product_leg.insert(product, ProductLeg::InProduction(mover, producer));
                        }
                    }
                    Some(Err(err)) => warn!(%err, "start_processing rejected"),
                    None => {}
                }
            }
        }

        let _ = self.bus.publish(BusMessage::PerformAck { unit });
    }

    fn handle_complete_ack(&mut self, unit: &str, observer: &mut dyn EngineObserver) {
        let Some(idx) = self.pending_completes.iter().position(|pc| pc.unit == unit) else {
            return;
        };
        let pending = self.pending_completes.remove(idx);
        match pending.kind {
            CompleteKind::Transport { .. } => {
                // Cursor doesn't advance for Transport — it isn't a recipe
                // step (§6); the mover is already queued at its producer.
            }
            CompleteKind::Production { .. } => match self.supervisor.advance(pending.product) {
                Ok(Some(record)) => {
                    observer.on_product_complete(&record);
                    self.product_leg.remove(&pending.product);
                    self.dispatched.remove(&pending.product);
                }
                Ok(None) => {
                    self.product_leg.insert(pending.product, ProductLeg::AwaitingTransport);
                    self.dispatched.remove(&pending.product);
                }
                Err(err) => warn!(%err, "advance failed for acknowledged product"),
            },
        }
    }

    fn supervisor_find_by_name(&self, name: &str) -> Option<ProductId> {
        self.supervisor.in_progress_snapshot().into_iter().find(|p| p.name == name).map(|p| p.id)
    }

    fn resolve_unit(&self, name: &str) -> Option<UnitRef> {
        if let Some(id) = self.registry.find_mover_by_name(name) {
            return Some(UnitRef::Mover(id));
        }
        self.registry.find_producer_by_name(name).map(UnitRef::Producer)
    }

    fn begin_complete(&mut self, unit: String, product: ProductId, kind: CompleteKind) {
        self.pending_completes.push(PendingComplete { unit, product, kind, attempts: 0, last_sent: None });
    }

    /// Retry every outstanding `Complete` whose retry interval has elapsed,
    /// dropping (and logging, non-fatally) any that just exhausted its
    /// budget of `broker_retry_count` attempts (§4.10/§7).
    fn pump_completes(&mut self, observer: &mut dyn EngineObserver) {
        let now = Instant::now();
        let interval = self.config.broker_retry_interval;
        let budget = self.config.broker_retry_count;

        let mut exhausted = Vec::new();
        for (idx, pending) in self.pending_completes.iter_mut().enumerate() {
            let due = match pending.last_sent {
                None => true,
                Some(at) => now.duration_since(at) >= interval,
            };
            if !due {
                continue;
            }
            if pending.attempts >= budget {
                exhausted.push(idx);
                continue;
            }
            let _ = self.bus.publish(BusMessage::Complete { unit: pending.unit.clone() });
            pending.attempts += 1;
            pending.last_sent = Some(now);
        }

        for idx in exhausted.into_iter().rev() {
            let pending = self.pending_completes.remove(idx);
            error!(unit = %pending.unit, "complete handshake exhausted retry budget");
            observer.on_complete_retry_exhausted(&pending.unit);
        }
    }

    fn release_mover_from(&mut self, mover: MoverId, producer: ProducerId) {
        self.mover_target_producer.remove(&mover);
        for (&product, leg) in self.product_leg.iter_mut() {
            let matches = matches!(
                leg,
                ProductLeg::AwaitingProduction(m, p) | ProductLeg::InProduction(m, p)
                    if *m == mover && *p == producer
            );
            if matches {
                *leg = ProductLeg::AwaitingTransport;
                self.dispatched.remove(&product);
            }
        }
    }

    // ── Dispatch: decide what the in-process dummy broker's FIFO needs next ─

    /// Compute the next broker task, if any, for every in-progress product
    /// that doesn't already have one in flight. Populates the `DummyBroker`
    /// FIFO (§4.11) — an external broker instead decides this by bidding,
    /// so this method is only meaningful when `sf_broker::DummyBroker` sits
    /// on the other end of the bus.
    pub fn pending_dispatches(&mut self) -> Vec<PendingStep> {
        let mut out = Vec::new();
        let products = self.supervisor.in_progress_snapshot();
        for product in products {
            if self.dispatched.contains(&product.id) {
                continue;
            }
            let Some(interaction) = product.current_interaction() else { continue };
            let leg = self.product_leg.get(&product.id).copied().unwrap_or(ProductLeg::AwaitingTransport);

            match leg {
                ProductLeg::AwaitingTransport => {
                    let Some(producer) = self.pick_producer(interaction) else { continue };
                    let Some(mover) = self.pick_idle_mover() else { continue };
                    let mover_name = self.registry.mover_name(mover).unwrap_or_default().to_string();
                    let producer_name = self.registry.producer_name(producer).unwrap_or_default().to_string();
                    self.mover_target_producer.insert(mover, producer);
                    self.product_leg.insert(product.id, ProductLeg::InTransport(mover, producer));
                    self.dispatched.insert(product.id);
                    out.push(PendingStep {
                        unit: mover_name,
                        service_requester: product.name.clone(),
                        interaction_url: Interaction::Transport.to_url().to_string(),
                        destination: Some(producer_name),
                    });
                }
                ProductLeg::AwaitingProduction(_, producer) => {
                    let producer_name = self.registry.producer_name(producer).unwrap_or_default().to_string();
                    self.dispatched.insert(product.id);
                    out.push(PendingStep {
                        unit: producer_name,
                        service_requester: product.name.clone(),
                        interaction_url: interaction.to_url().to_string(),
                        destination: None,
                    });
                }
                ProductLeg::InTransport(..) | ProductLeg::InProduction(..) => {}
            }
        }
        out
    }

    fn pick_producer(&self, interaction: Interaction) -> Option<ProducerId> {
        self.registry
            .producers()
            .iter()
            .filter(|p| p.state == UnitState::Alive && p.interaction_cost.contains_key(&interaction))
            .min_by_key(|p| p.queue.len() + usize::from(p.service_requester.is_some()))
            .map(|p| p.id)
    }

    fn pick_idle_mover(&self) -> Option<MoverId> {
        self.registry
            .movers()
            .iter()
            .find(|m| {
                m.state == UnitState::Alive
                    && !m.disabled
                    && m.service_requester.is_none()
                    && !self.mover_target_producer.contains_key(&m.id)
            })
            .map(|m| m.id)
    }

    // ── Commands (§9's `Engine::event`) ────────────────────────────────────

    pub fn create_product(&mut self, product_type: ProductType) -> ProductId {
        self.supervisor.create_product(product_type)
    }

    /// `ToggleState`: flip a producer's Alive/Blocked state, publish the
    /// `StateChange` the broker needs to see, and free any mover bailed
    /// out of its queue (§4.6).
    pub fn toggle_producer(&mut self, producer: ProducerId) {
        let events = self.registry.toggle_producer_state(producer);
        if let Some(name) = self.registry.producer_name(producer) {
            if let Some(p) = self.registry.producer(producer) {
                let _ = self.bus.publish(BusMessage::StateChange(StateChangePayload {
                    name: name.to_string(),
                    state: state_name(p.state),
                }));
            }
        }
        for event in events {
            if let TickEvent::ProductionBailed { producer, mover } = event {
                self.release_mover_from(mover, producer);
            }
        }
    }

    pub fn set_mover_disabled(&mut self, mover: MoverId, disabled: bool) {
        if let Some(m) = self.registry.mover_mut(mover) {
            m.set_disabled(disabled);
        }
    }

    /// `FullReset`: return every mover/producer to its blueprint pose and
    /// clear every broker/supervisor dispatch record this engine tracks.
    /// `hard` also wipes cumulative counters and the product supervisor's
    /// history (§4.7, §4.9, and `DESIGN.md`'s resolution of the source's
    /// ambiguous `FullReset(true)` usage).
    pub fn reset(&mut self, hard: bool) {
        self.registry.full_reset(hard);
        self.pending_requests.clear();
        self.pending_completes.clear();
        self.product_leg.clear();
        self.mover_target_producer.clear();
        self.dispatched.clear();
        self.mover_distance_baseline.clear();
        if hard {
            self.supervisor.reset();
        }
    }

    /// `Purge`: engine-initiated end of the bidding session. Idempotent —
    /// calling this more than once only publishes `Purge` the first time
    /// (§8: "Purge is idempotent").
    pub fn shutdown(&mut self) {
        if self.purged {
            return;
        }
        self.purged = true;
        let _ = self.bus.publish(BusMessage::Purge);
    }

    pub fn is_shutdown(&self) -> bool {
        self.purged
    }

    /// A read-only snapshot of every unit's state, for a render thread or
    /// UI collaborator that must not hold a lock on the registry across a
    /// frame (§5, §9).
    pub fn render_snapshot(&self) -> RenderSnapshot {
        let units = self
            .registry
            .movers()
            .iter()
            .map(|m| UnitSnapshot {
                name: self.registry.mover_name(m.id).unwrap_or_default().to_string(),
                kind: UnitKind::Mover,
                position: m.position,
                dimension: m.dimension,
                state: m.state,
            })
            .chain(self.registry.producers().iter().map(|p| UnitSnapshot {
                name: self.registry.producer_name(p.id).unwrap_or_default().to_string(),
                kind: UnitKind::Producer,
                position: p.position,
                dimension: p.dimension,
                state: p.state,
            }))
            .collect();

        RenderSnapshot {
            tick: self.clock.current_tick,
            units,
            metrics: EngineMetrics {
                tick: self.clock.current_tick,
                collision_count: self.registry.collision_count(),
                in_progress_products: self.supervisor.in_progress_count(),
                completed_products: self.supervisor.completed_count(),
            },
            completed: self.supervisor.completed_snapshot(),
        }
    }
}

/// Reject a blueprint with a duplicate unit name or a non-positive
/// dimension/extent before `Registry::from_blueprint` ever builds a grid or
/// name lookup table out of it (§4.1's data model).
fn validate_blueprint(spec: &BlueprintSpec) -> SimResult<()> {
    if spec.floor_extent.x <= 0.0 || spec.floor_extent.y <= 0.0 {
        return Err(SimError::Blueprint("floor_extent must be positive in both axes".to_string()));
    }
    if spec.cell_size.x <= 0.0 || spec.cell_size.y <= 0.0 {
        return Err(SimError::Blueprint("cell_size must be positive in both axes".to_string()));
    }

    let mut seen = HashSet::new();
    for mover in &spec.movers {
        if !seen.insert(mover.name.as_str()) {
            return Err(SimError::Blueprint(format!("duplicate unit name {:?}", mover.name)));
        }
        if mover.dimension.x <= 0.0 || mover.dimension.y <= 0.0 {
            return Err(SimError::Blueprint(format!("mover {:?} has a non-positive dimension", mover.name)));
        }
    }
    for producer in &spec.producers {
        if !seen.insert(producer.name.as_str()) {
            return Err(SimError::Blueprint(format!("duplicate unit name {:?}", producer.name)));
        }
        if producer.dimension.x <= 0.0 || producer.dimension.y <= 0.0 {
            return Err(SimError::Blueprint(format!("producer {:?} has a non-positive dimension", producer.name)));
        }
    }
    Ok(())
}

fn state_name(state: UnitState) -> String {
    match state {
        UnitState::Alive => "Alive".to_string(),
        UnitState::Blocked => "Blocked".to_string(),
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UnitKind {
    Mover,
    Producer,
}

#[derive(Clone, Debug)]
pub struct UnitSnapshot {
    pub name: String,
    pub kind: UnitKind,
    pub position: sf_core::Vec2,
    pub dimension: sf_core::Vec2,
    pub state: UnitState,
}

#[derive(Clone, Debug)]
pub struct RenderSnapshot {
    pub tick: Tick,
    pub units: Vec<UnitSnapshot>,
    pub metrics: EngineMetrics,
    pub completed: Vec<CompletedRecord>,
}

