//! `sf-broker` — the bidding broker protocol (C10) and the in-process
//! dummy broker (C11) that implements the same contract.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|-----------------------------------------------------------------|
//! | [`protocol`]| `BusMessage`, payload structs, topics, JSON wire envelope (§6)   |
//! | [`bus`]     | `MessageBus` trait, `ChannelBus`, `channel_pair`                 |
//! | [`session`] | `CreateSession` — retried, ordered Create handshake         |
//! | [`dummy`]   | `DummyBroker` — internal FIFO task source, same contract         |
//! | [`error`]   | `BrokerError`, `BrokerResult<T>`                                 |

pub mod bus;
pub mod dummy;
pub mod error;
pub mod protocol;
pub mod session;

#[cfg(test)]
mod tests;

pub use bus::{channel_pair, BusEndpoint, ChannelBus, MessageBus};
pub use dummy::{DummyBroker, PendingStep};
pub use error::{BrokerError, BrokerResult};
pub use protocol::{
    AcknowledgePayload, BusMessage, CompletePayload, CreatePayload, PerformPayload, PurgePayload,
    RequestCostPayload, ResponseCostPayload, StateChangePayload, WireMessage,
};
pub use session::CreateSession;
