//! Broker-subsystem error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("create handshake for unit {0} exhausted its retry budget")]
    CreateRetryExhausted(String),

    #[error("complete handshake for unit {0} exhausted its retry budget")]
    CompleteRetryExhausted(String),

    #[error("message bus is disconnected")]
    BusDisconnected,

    #[error("unknown message type on the wire: {0}")]
    UnknownMessageType(String),

    #[error("malformed payload for {message_type}: {source}")]
    MalformedPayload {
        message_type: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type BrokerResult<T> = Result<T, BrokerError>;
