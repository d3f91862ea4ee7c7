//! Dummy broker (component C11): an internal, optional task source
//! implementing the same create/perform/complete contract as an external
//! broker, so the engine can run standalone (`demos/basic` uses exactly
//! this).
//!
//! Unlike the real broker, nothing here negotiates a bid — it is a plain
//! FIFO of outstanding product steps, serviced one at a time, aligned to
//! the caller's update interval (its "produce cycle", §4.11).

use std::collections::VecDeque;
use std::time::Duration;

use crossbeam_channel::Receiver;
use tracing::trace;

use crate::bus::MessageBus;
use crate::error::BrokerResult;
use crate::protocol::{AcknowledgePayload, BusMessage, PerformPayload, RequestCostPayload};

/// One product step waiting to be dispatched: "ask `unit` to perform
/// `interaction`, optionally targeting `destination`".
#[derive(Clone, Debug, PartialEq)]
pub struct PendingStep {
    pub unit: String,
    pub service_requester: String,
    pub interaction_url: String,
    pub destination: Option<String>,
}

/// The broker's own view of where one dispatched step is in its
/// request/perform/complete cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepPhase {
    AwaitingCost,
    AwaitingPerformAck,
    AwaitingComplete,
}

/// Internal task source implementing the C10 contract locally.
///
/// `Procedure` in the source's own terms: a singleton whose produce cycle
/// is driven by the caller once per tick via [`DummyBroker::drive`], rather
/// than by its own thread — the engine's own update loop already runs at
/// `target_ups`, and this broker has no independent timing requirement, so
/// piggybacking on that cadence keeps its "produce cycle aligned to the
/// current update interval" (§4.11) without a second timer.
pub struct DummyBroker {
    bus: Box<dyn MessageBus>,
    inbound: Receiver<BusMessage>,
    fifo: VecDeque<PendingStep>,
    in_flight: Option<(PendingStep, StepPhase)>,
}

impl DummyBroker {
    pub fn new(bus: Box<dyn MessageBus>, inbound: Receiver<BusMessage>) -> Self {
        Self { bus, inbound, fifo: VecDeque::new(), in_flight: None }
    }

    /// Queue a product step for eventual dispatch.
    pub fn enqueue(&mut self, step: PendingStep) {
        self.fifo.push_back(step);
    }

    pub fn pending_len(&self) -> usize {
        self.fifo.len() + self.in_flight.is_some() as usize
    }

    /// Acknowledge an engine `Create` immediately — the dummy broker never
    /// withholds creation.
    pub fn handle_create(&self, payload: &crate::protocol::CreatePayload) -> BrokerResult<()> {
        self.bus.publish(BusMessage::CreateAck(AcknowledgePayload { name: payload.name.clone() }))
    }

    /// Wait up to `timeout` for the next inbound message and, if it is a
    /// `Create`, acknowledge it immediately. Returns `true` if a `Create`
    /// was acknowledged. Used to service the engine's startup handshake
    /// (`CreateSession`) from a scoped thread that borrows this broker
    /// immutably, concurrently with `CreateSession::run`'s own retry loop
    /// (§4.10/§5 — the broker's side of the handshake is its own actor).
    pub fn try_ack_next_create(&self, timeout: Duration) -> BrokerResult<bool> {
        match self.inbound.recv_timeout(timeout) {
            Ok(BusMessage::Create(payload)) => {
                self.handle_create(&payload)?;
                Ok(true)
            }
            Ok(_other) => Ok(false),
            Err(_timeout) => Ok(false),
        }
    }

    /// Drive the dummy broker's produce cycle by exactly one step. Call
    /// once per engine tick. Drains any reply waiting on `inbound` for the
    /// in-flight step and, if nothing is in flight, starts the next FIFO
    /// entry.
    pub fn drive(&mut self) -> BrokerResult<()> {
        if self.in_flight.is_none() {
            if let Some(step) = self.fifo.pop_front() {
                self.bus.publish(BusMessage::RequestCost {
                    unit: step.unit.clone(),
                    payload: RequestCostPayload {
                        service_requester: step.service_requester.clone(),
                        interaction_element: step.interaction_url.clone(),
                        destination: step.destination.clone(),
                    },
                })?;
                self.in_flight = Some((step, StepPhase::AwaitingCost));
            }
            return Ok(());
        }

        while let Ok(msg) = self.inbound.try_recv() {
            self.advance(msg)?;
        }
        Ok(())
    }

    /// Block up to `timeout` for the next inbound message and advance the
    /// in-flight step if it matches. Used by synchronous tests that don't
    /// want to poll `drive` in a spin loop.
    pub fn drive_blocking(&mut self, timeout: Duration) -> BrokerResult<()> {
        self.drive()?;
        if self.in_flight.is_some() {
            if let Ok(msg) = self.inbound.recv_timeout(timeout) {
                self.advance(msg)?;
            }
        }
        Ok(())
    }

    fn advance(&mut self, msg: BusMessage) -> BrokerResult<()> {
        let Some((step, phase)) = self.in_flight.take() else {
            return Ok(());
        };
        match (phase, msg) {
            (
                StepPhase::AwaitingCost,
                BusMessage::ResponseCost { unit, payload },
            ) if unit == step.unit => {
                trace!(unit = %unit, cost = payload.cost, "dummy broker received cost");
                self.bus.publish(BusMessage::Perform {
                    unit: step.unit.clone(),
                    payload: PerformPayload {
                        interaction_element: step.interaction_url.clone(),
                        destination: step.destination.clone(),
                    },
                })?;
                self.in_flight = Some((step, StepPhase::AwaitingPerformAck));
            }
            (StepPhase::AwaitingPerformAck, BusMessage::PerformAck { unit }) if unit == step.unit => {
                self.in_flight = Some((step, StepPhase::AwaitingComplete));
            }
            (StepPhase::AwaitingComplete, BusMessage::Complete { unit }) if unit == step.unit => {
                self.bus.publish(BusMessage::CompleteAck { unit: unit.clone() })?;
                trace!(unit = %unit, "dummy broker step complete");
                // in_flight left empty; next drive() call pops the FIFO.
            }
            (phase, other) => {
                // Stale or out-of-order reply: put the step back exactly as
                // it was and ignore the message.
                self.in_flight = Some((step, phase));
                let _ = other;
            }
        }
        Ok(())
    }
}
