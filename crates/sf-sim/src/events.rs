//! Per-tick outcomes the environment registry hands back to the engine
//! layer, so broker handshakes and observer callbacks can react without the
//! registry itself knowing anything about the bidding protocol (§5, §9).

use sf_core::{MoverId, ProducerId, ProductId};

/// Something noteworthy that happened to a unit during [`crate::registry::Registry::step`]
/// or [`crate::registry::Registry::toggle_producer_state`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TickEvent {
    /// `mover` reached its destination while bound to `product`'s transport
    /// step — the engine should fire `Complete` on the broker session.
    TransportArrived { mover: MoverId, product: ProductId },
    /// `producer`'s bound interaction for `mover` just finished counting
    /// down (§4.6).
    ProducerInteractionComplete { producer: ProducerId, mover: MoverId },
    /// `mover` was sitting in `producer`'s queue when the producer was
    /// toggled `Blocked` and was bailed out (§4.6).
    ProductionBailed { producer: ProducerId, mover: MoverId },
    /// `mover` registered a new collision episode this tick (§4.5).
    CollisionDetected { mover: MoverId },
}
