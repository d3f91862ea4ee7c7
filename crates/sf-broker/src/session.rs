//! Create and Complete handshakes (component C10): ordered, retried,
//! acknowledged message exchanges with the broker (§4.10, §5).
//!
//! Both sessions drive their retry loop off `Receiver::recv_timeout`, so the
//! retry interval *is* the wait: no separate timer thread is needed, and the
//! blocking call naturally yields the "evaluate once every `interval`"
//! cadence §8's boundary tests require.

use std::time::Duration;

use crossbeam_channel::Receiver;
use tracing::{debug, warn};

use crate::bus::MessageBus;
use crate::error::{BrokerError, BrokerResult};
use crate::protocol::{BusMessage, CreatePayload};

/// Engine-side driver for the Create handshake: enumerate all units and
/// send `Create` one at a time, waiting for the matching `Acknowledge`
/// before moving to the next unit (§4.10's "strict ordering").
pub struct CreateSession<'a> {
    bus: &'a dyn MessageBus,
    ack_rx: &'a Receiver<BusMessage>,
    retry_count: u32,
    retry_interval: Duration,
}

impl<'a> CreateSession<'a> {
    pub fn new(
        bus: &'a dyn MessageBus,
        ack_rx: &'a Receiver<BusMessage>,
        retry_count: u32,
        retry_interval: Duration,
    ) -> Self {
        Self { bus, ack_rx, retry_count, retry_interval }
    }

    /// Create every unit in order. Aborts on the first unit whose retry
    /// budget is exhausted — per §4.10/§7, Create failure is fatal for the
    /// bidding session and escalates to the supervisor, which purges.
    pub fn run(&self, units: &[CreatePayload]) -> BrokerResult<()> {
        for unit in units {
            self.send_with_retry(unit)?;
            debug!(unit = %unit.name, "create acknowledged");
        }
        Ok(())
    }

    fn send_with_retry(&self, unit: &CreatePayload) -> BrokerResult<()> {
        for attempt in 0..self.retry_count {
            self.bus.publish(BusMessage::Create(unit.clone()))?;
            match self.ack_rx.recv_timeout(self.retry_interval) {
                Ok(BusMessage::CreateAck(ack)) if ack.name == unit.name => return Ok(()),
                Ok(_stale) => continue,
                Err(_timeout) => {
                    warn!(unit = %unit.name, attempt, "create ack timed out, retrying");
                }
            }
        }
        Err(BrokerError::CreateRetryExhausted(unit.name.clone()))
    }
}

/// Engine-side driver for the Complete handshake: publish `Complete` for a
/// unit, retrying until `CompleteAck` arrives or the retry budget is spent
/// (§4.10). Exhaustion here is non-fatal — the caller logs the failure and
/// leaves the product in the in-progress tracker (§7).
///
/// `sf-sim`'s `Engine` does not drive `Complete` through this blocking
/// session — a steady-state tick can't afford to stall on one retry loop,
/// so `Engine::pump_completes` polls its own retry budget once per tick
/// instead (see `DESIGN.md`). Kept here, test-only, as the blocking
/// reference implementation the non-blocking poller is grounded on.
#[cfg(test)]
pub struct CompleteSession<'a> {
    bus: &'a dyn MessageBus,
    ack_rx: &'a Receiver<BusMessage>,
    retry_count: u32,
    retry_interval: Duration,
}

#[cfg(test)]
impl<'a> CompleteSession<'a> {
    pub fn new(
        bus: &'a dyn MessageBus,
        ack_rx: &'a Receiver<BusMessage>,
        retry_count: u32,
        retry_interval: Duration,
    ) -> Self {
        Self { bus, ack_rx, retry_count, retry_interval }
    }

    pub fn run(&self, unit: &str) -> BrokerResult<()> {
        for attempt in 0..self.retry_count {
            self.bus.publish(BusMessage::Complete { unit: unit.to_string() })?;
            match self.ack_rx.recv_timeout(self.retry_interval) {
                Ok(BusMessage::CompleteAck { unit: acked }) if acked == unit => return Ok(()),
                Ok(_stale) => continue,
                Err(_timeout) => {
                    warn!(unit, attempt, "complete ack timed out, retrying");
                }
            }
        }
        Err(BrokerError::CompleteRetryExhausted(unit.to_string()))
    }
}
