//! Producer model (component C6): queue, interaction counters, the
//! Idle → Queued → Processing → Idle state machine, and cost queries.

use std::collections::{HashMap, VecDeque};

use sf_core::{Interaction, MoverId, ProducerId, Rect, Vec2};

use crate::error::{AgentError, AgentResult};
use crate::unit::UnitState;

/// The producer's derived processing phase (§4.6). Not stored directly —
/// computed from `queue`/`service_requester` so it can never drift out of
/// sync with the state it's derived from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ProcessingPhase {
    Idle,
    Queued,
    Processing,
}

/// Stationary production unit that performs one or more `Interaction`s.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Producer {
    pub id: ProducerId,
    pub state: UnitState,
    pub position: Vec2,
    pub dimension: Vec2,
    /// Where movers dock to be serviced.
    pub processer_position: Vec2,
    pub interaction_cost: HashMap<Interaction, u32>,
    /// Per-interaction `(count, ticks)` accumulated since the last reset.
    pub interaction_counter: HashMap<Interaction, (u32, u32)>,
    /// FIFO except removals by id.
    pub queue: VecDeque<MoverId>,
    pub service_requester: Option<MoverId>,
    pub processing_countdown: u32,
    pub empty_queued_ticks: u32,
    current_interaction: Option<Interaction>,
}

impl Producer {
    pub fn new(id: ProducerId, position: Vec2, dimension: Vec2, processer_position: Vec2) -> Self {
        Self {
            id,
            state: UnitState::Alive,
            position,
            dimension,
            processer_position,
            interaction_cost: HashMap::new(),
            interaction_counter: HashMap::new(),
            queue: VecDeque::new(),
            service_requester: None,
            processing_countdown: 0,
            empty_queued_ticks: 0,
            current_interaction: None,
        }
    }

    #[inline]
    pub fn footprint(&self) -> Rect {
        Rect::new(self.position, self.dimension)
    }

    pub fn phase(&self) -> ProcessingPhase {
        if self.service_requester.is_some() {
            ProcessingPhase::Processing
        } else if !self.queue.is_empty() {
            ProcessingPhase::Queued
        } else {
            ProcessingPhase::Idle
        }
    }

    /// Cost query for a non-`Transport` interaction: the configured cost if
    /// supported, else zero (§4.6).
    pub fn cost_query(&self, interaction: Interaction) -> u32 {
        self.interaction_cost.get(&interaction).copied().unwrap_or(0)
    }

    /// Append a mover to the back of the queue.
    pub fn enqueue(&mut self, mover: MoverId) {
        self.queue.push_back(mover);
    }

    /// Remove a mover from the queue by id, wherever it sits (queue
    /// removals are by id, not only from the front). Returns `true` if it
    /// was present.
    pub fn remove_from_queue(&mut self, mover: MoverId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|&m| m != mover);
        self.queue.len() != before
    }

    /// `StartProcessing`: bind the head of the queue as this producer's
    /// `service_requester` and begin counting down `cost` ticks for
    /// `interaction` (§4.6).
    ///
    /// Zero-cost interactions complete synchronously — returned as
    /// `Ok(Some(mover))` without ever entering the bound state, preserving
    /// the invariant `processing_countdown > 0 ⇔ service_requester bound`
    /// (§8). Otherwise returns `Ok(None)`; the caller learns of completion
    /// from a later [`tick`](Self::tick).
    pub fn start_processing(
        &mut self,
        interaction: Interaction,
        cost: u32,
    ) -> AgentResult<Option<MoverId>> {
        if self.state != UnitState::Alive {
            return Err(AgentError::ProducerNotAlive(self.id));
        }
        if self.service_requester.is_some() {
            return Err(AgentError::ProducerAlreadyBound(self.id));
        }
        let Some(mover) = self.queue.pop_front() else {
            return Ok(None);
        };

        let counter = self.interaction_counter.entry(interaction).or_insert((0, 0));
        counter.0 += 1;

        if cost == 0 {
            return Ok(Some(mover));
        }

        self.service_requester = Some(mover);
        self.processing_countdown = cost;
        self.current_interaction = Some(interaction);
        Ok(None)
    }

    /// One tick of producer bookkeeping. Returns the mover whose interaction
    /// just finished, if the countdown reached zero this tick.
    pub fn tick(&mut self) -> Option<MoverId> {
        if self.service_requester.is_some() {
            if let Some(interaction) = self.current_interaction {
                if let Some(counter) = self.interaction_counter.get_mut(&interaction) {
                    counter.1 += 1;
                }
            }
            self.processing_countdown = self.processing_countdown.saturating_sub(1);
            if self.processing_countdown == 0 {
                self.current_interaction = None;
                return self.service_requester.take();
            }
        } else if self.state == UnitState::Blocked || self.queue.is_empty() {
            self.empty_queued_ticks = self.empty_queued_ticks.saturating_add(1);
        }
        None
    }

    /// `ToggleState`: flip Alive↔Blocked. Becoming `Blocked` bails every
    /// queued mover (returned for the caller to notify via
    /// `ProductionBailed`), empties the queue, and cancels any in-flight
    /// processing (§4.6).
    pub fn toggle_state(&mut self) -> Vec<MoverId> {
        match self.state {
            UnitState::Alive => {
                self.state = UnitState::Blocked;
                let bailed: Vec<MoverId> = self.queue.drain(..).collect();
                self.service_requester = None;
                self.processing_countdown = 0;
                self.current_interaction = None;
                bailed
            }
            UnitState::Blocked => {
                self.state = UnitState::Alive;
                Vec::new()
            }
        }
    }
}
