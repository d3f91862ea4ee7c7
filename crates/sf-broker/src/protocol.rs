//! Bidding broker protocol (component C10): the six message kinds on the
//! bus, their `i4sim/...` topics, and the JSON wire envelope (§6).
//!
//! This module only models the *contract* — payload shapes, topics, and a
//! `messageType`-tagged envelope for round-tripping through JSON. The
//! transport itself (an actual publish/subscribe broker) is an external
//! collaborator per §1's Non-goals; within this workspace it is represented
//! by [`crate::bus::MessageBus`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BrokerError, BrokerResult};

// ── Payload schemas (§6) ───────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatePayload {
    pub name: String,
    pub location: [f32; 2],
    pub model: String,
    #[serde(rename = "interactionElements")]
    pub interaction_elements: Vec<String>,
    pub state: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AcknowledgePayload {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestCostPayload {
    #[serde(rename = "serviceRequester")]
    pub service_requester: String,
    #[serde(rename = "interactionElement")]
    pub interaction_element: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub destination: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseCostPayload {
    pub cost: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformPayload {
    #[serde(rename = "interactionElement")]
    pub interaction_element: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub destination: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletePayload {}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateChangePayload {
    pub name: String,
    pub state: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PurgePayload {}

// ── BusMessage ──────────────────────────────────────────────────────────────

/// One message on the bus. `unit` fields carry the topic's `<unit>`
/// placeholder for the message kinds whose payload doesn't already name a
/// unit (§6).
#[derive(Clone, Debug, PartialEq)]
pub enum BusMessage {
    Create(CreatePayload),
    CreateAck(AcknowledgePayload),
    StateChange(StateChangePayload),
    RequestCost { unit: String, payload: RequestCostPayload },
    ResponseCost { unit: String, payload: ResponseCostPayload },
    Perform { unit: String, payload: PerformPayload },
    PerformAck { unit: String },
    Complete { unit: String },
    CompleteAck { unit: String },
    Purge,
}

impl BusMessage {
    /// The `i4sim/...` topic this message is published on (§6).
    pub fn topic(&self) -> String {
        match self {
            BusMessage::Create(_) => "i4sim/create".to_string(),
            BusMessage::CreateAck(_) => "i4sim/create/ack".to_string(),
            BusMessage::StateChange(p) => format!("i4sim/{}/stateChange", p.name),
            BusMessage::RequestCost { unit, .. } => format!("i4sim/{unit}/requestCost"),
            BusMessage::ResponseCost { unit, .. } => format!("i4sim/{unit}/responseCost"),
            BusMessage::Perform { unit, .. } => format!("i4sim/{unit}/perform"),
            BusMessage::PerformAck { unit } => format!("i4sim/{unit}/perform/ack"),
            BusMessage::Complete { unit } => format!("i4sim/{unit}/complete"),
            BusMessage::CompleteAck { unit } => format!("i4sim/{unit}/complete/ack"),
            BusMessage::Purge => "i4sim/purge".to_string(),
        }
    }

    /// The `messageType` discriminator used on the wire.
    pub fn message_type(&self) -> &'static str {
        match self {
            BusMessage::Create(_) => "Create",
            BusMessage::CreateAck(_) => "Acknowledge",
            BusMessage::StateChange(_) => "StateChange",
            BusMessage::RequestCost { .. } => "RequestCost",
            BusMessage::ResponseCost { .. } => "ResponseCost",
            BusMessage::Perform { .. } => "Perform",
            BusMessage::PerformAck { .. } => "Acknowledge",
            BusMessage::Complete { .. } => "Complete",
            BusMessage::CompleteAck { .. } => "Acknowledge",
            BusMessage::Purge => "Purge",
        }
    }

    /// Encode to the JSON wire envelope (§8: "JSON Create↔decode round-trip
    /// preserves all fields").
    pub fn to_wire(&self) -> BrokerResult<WireMessage> {
        let payload = match self {
            BusMessage::Create(p) => to_value("Create", p)?,
            BusMessage::CreateAck(p) => to_value("Acknowledge", p)?,
            BusMessage::StateChange(p) => to_value("StateChange", p)?,
            BusMessage::RequestCost { payload, .. } => to_value("RequestCost", payload)?,
            BusMessage::ResponseCost { payload, .. } => to_value("ResponseCost", payload)?,
            BusMessage::Perform { payload, .. } => to_value("Perform", payload)?,
            BusMessage::PerformAck { unit } => {
                to_value("Acknowledge", &AcknowledgePayload { name: unit.clone() })?
            }
            BusMessage::Complete { .. } => to_value("Complete", &CompletePayload::default())?,
            BusMessage::CompleteAck { unit } => {
                to_value("Acknowledge", &AcknowledgePayload { name: unit.clone() })?
            }
            BusMessage::Purge => to_value("Purge", &PurgePayload::default())?,
        };
        Ok(WireMessage {
            message_type: self.message_type().to_string(),
            topic: self.topic(),
            payload,
        })
    }

    /// Decode a [`WireMessage`] back into a `BusMessage`. The topic (not
    /// just the `messageType`) disambiguates `Acknowledge`, since the same
    /// discriminator is reused for create-ack, perform-ack, and
    /// complete-ack (§6).
    pub fn from_wire(wire: &WireMessage) -> BrokerResult<BusMessage> {
        let unit = unit_from_topic(&wire.topic);
        match wire.message_type.as_str() {
            "Create" => Ok(BusMessage::Create(from_value("Create", &wire.payload)?)),
            "StateChange" => Ok(BusMessage::StateChange(from_value("StateChange", &wire.payload)?)),
            "RequestCost" => Ok(BusMessage::RequestCost {
                unit: unit.ok_or_else(|| missing_unit(&wire.topic))?,
                payload: from_value("RequestCost", &wire.payload)?,
            }),
            "ResponseCost" => Ok(BusMessage::ResponseCost {
                unit: unit.ok_or_else(|| missing_unit(&wire.topic))?,
                payload: from_value("ResponseCost", &wire.payload)?,
            }),
            "Perform" if wire.topic.ends_with("/perform") => Ok(BusMessage::Perform {
                unit: unit.ok_or_else(|| missing_unit(&wire.topic))?,
                payload: from_value("Perform", &wire.payload)?,
            }),
            "Complete" if wire.topic.ends_with("/complete") => Ok(BusMessage::Complete {
                unit: unit.ok_or_else(|| missing_unit(&wire.topic))?,
            }),
            "Purge" => Ok(BusMessage::Purge),
            "Acknowledge" if wire.topic == "i4sim/create/ack" => {
                Ok(BusMessage::CreateAck(from_value("Acknowledge", &wire.payload)?))
            }
            "Acknowledge" if wire.topic.ends_with("/perform/ack") => Ok(BusMessage::PerformAck {
                unit: unit.ok_or_else(|| missing_unit(&wire.topic))?,
            }),
            "Acknowledge" if wire.topic.ends_with("/complete/ack") => Ok(BusMessage::CompleteAck {
                unit: unit.ok_or_else(|| missing_unit(&wire.topic))?,
            }),
            other => Err(BrokerError::UnknownMessageType(other.to_string())),
        }
    }
}

/// Extract the `<unit>` segment from a topic of the shape
/// `i4sim/<unit>/<suffix...>`. Returns `None` for topics with no unit
/// segment (`i4sim/create`, `i4sim/create/ack`, `i4sim/purge`).
fn unit_from_topic(topic: &str) -> Option<String> {
    let rest = topic.strip_prefix("i4sim/")?;
    let unit = rest.split('/').next()?;
    if unit.is_empty() || unit == "create" || unit == "purge" {
        None
    } else {
        Some(unit.to_string())
    }
}

fn missing_unit(topic: &str) -> BrokerError {
    BrokerError::UnknownMessageType(format!("no unit segment in topic {topic}"))
}

fn to_value<T: Serialize>(message_type: &str, payload: &T) -> BrokerResult<Value> {
    serde_json::to_value(payload).map_err(|source| BrokerError::MalformedPayload {
        message_type: message_type.to_string(),
        source,
    })
}

fn from_value<T: for<'de> Deserialize<'de>>(message_type: &str, value: &Value) -> BrokerResult<T> {
    serde_json::from_value(value.clone()).map_err(|source| BrokerError::MalformedPayload {
        message_type: message_type.to_string(),
        source,
    })
}

/// The JSON envelope actually carried over the bus: `{messageType, topic,
/// payload}`. `topic` is not part of spec.md's payload schema table but is
/// required to route `Acknowledge` (reused across three topics) and to
/// disambiguate `Perform`/`Complete` from their `/ack` counterparts when
/// decoding without external topic context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(rename = "messageType")]
    pub message_type: String,
    pub topic: String,
    pub payload: Value,
}
