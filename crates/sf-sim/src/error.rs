//! Engine-level error type.
//!
//! Per §7's propagation policy: this is reserved for conditions a caller
//! must decide about (blueprint validation, Create-retry exhaustion
//! escalating to the supervisor). Everything recoverable (navigation
//! failure, unknown URL, stale unit reference, queue overflow) is logged
//! and swallowed at the call site instead of surfacing here.

use thiserror::Error;

use sf_broker::BrokerError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("blueprint error: {0}")]
    Blueprint(String),

    #[error("broker create handshake failed, purging bidding session: {0}")]
    Broker(#[from] BrokerError),
}

pub type SimResult<T> = Result<T, SimError>;
