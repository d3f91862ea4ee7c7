//! Agent-subsystem error type.

use thiserror::Error;

use sf_core::{MoverId, ProducerId};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("producer {0} is not alive")]
    ProducerNotAlive(ProducerId),

    #[error("producer {0} already has a bound service requester")]
    ProducerAlreadyBound(ProducerId),

    #[error("mover {0} is disabled")]
    MoverDisabled(MoverId),
}

pub type AgentResult<T> = Result<T, AgentError>;
