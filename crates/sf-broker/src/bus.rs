//! The message-bus seam the broker protocol is built on.
//!
//! Per §1's Non-goals, the actual publish/subscribe broker is an external
//! collaborator — this crate only needs something it can publish
//! [`BusMessage`]s to and receive them from. [`ChannelBus`] is the
//! in-process implementation used by the dummy broker and by tests; a real
//! deployment swaps in an adapter over whatever message-bus client the
//! application links against.

use crossbeam_channel::{Receiver, Sender};

use crate::error::{BrokerError, BrokerResult};
use crate::protocol::BusMessage;

/// Anything that can publish a [`BusMessage`]. Implemented by whichever side
/// holds the "send" half of a session — the engine publishes `Create`,
/// `ResponseCost`, `Complete`, …; the broker publishes `Acknowledge`,
/// `RequestCost`, `Perform`, ….
pub trait MessageBus: Send + Sync {
    fn publish(&self, message: BusMessage) -> BrokerResult<()>;
}

/// A `MessageBus` backed by a `crossbeam_channel::Sender`.
///
/// Construct a connected pair with [`channel_pair`] — one `ChannelBus` per
/// direction, matching the engine↔broker wiring in §5 ("the message bus
/// client performs I/O in its own actor").
#[derive(Clone)]
pub struct ChannelBus {
    sender: Sender<BusMessage>,
}

impl ChannelBus {
    pub fn new(sender: Sender<BusMessage>) -> Self {
        Self { sender }
    }
}

impl MessageBus for ChannelBus {
    fn publish(&self, message: BusMessage) -> BrokerResult<()> {
        self.sender.send(message).map_err(|_| BrokerError::BusDisconnected)
    }
}

/// One side of a bidirectional in-process bus: publish on `outbound`,
/// receive on `inbound`.
pub struct BusEndpoint {
    pub outbound: ChannelBus,
    pub inbound: Receiver<BusMessage>,
}

/// Build two connected [`BusEndpoint`]s: whatever `a` publishes, `b`
/// receives, and vice versa.
pub fn channel_pair() -> (BusEndpoint, BusEndpoint) {
    let (a_to_b, b_from_a) = crossbeam_channel::unbounded();
    let (b_to_a, a_from_b) = crossbeam_channel::unbounded();
    (
        BusEndpoint { outbound: ChannelBus::new(a_to_b), inbound: a_from_b },
        BusEndpoint { outbound: ChannelBus::new(b_to_a), inbound: b_from_a },
    )
}
