//! Protocol round-trip, retry-budget, and dummy-broker cycle tests.

use std::thread;
use std::time::Duration;

use sf_core::Interaction;

use crate::bus::channel_pair;
use crate::dummy::{DummyBroker, PendingStep};
use crate::protocol::{
    AcknowledgePayload, BusMessage, CreatePayload, PerformPayload, RequestCostPayload,
    ResponseCostPayload,
};
use crate::session::{CompleteSession, CreateSession};

fn create_payload(name: &str) -> CreatePayload {
    CreatePayload {
        name: name.to_string(),
        location: [0.0, 0.0],
        model: "mover".to_string(),
        interaction_elements: vec![Interaction::Transport.to_url().to_string()],
        state: "Alive".to_string(),
    }
}

#[test]
fn wire_round_trip_preserves_fields() {
    let cases = vec![
        BusMessage::Create(create_payload("M1")),
        BusMessage::CreateAck(AcknowledgePayload { name: "M1".to_string() }),
        BusMessage::RequestCost {
            unit: "P1".to_string(),
            payload: RequestCostPayload {
                service_requester: "M1".to_string(),
                interaction_element: Interaction::PlaceHousing.to_url().to_string(),
                destination: Some("P1".to_string()),
            },
        },
        BusMessage::ResponseCost { unit: "P1".to_string(), payload: ResponseCostPayload { cost: 40 } },
        BusMessage::Perform {
            unit: "M1".to_string(),
            payload: PerformPayload {
                interaction_element: Interaction::Transport.to_url().to_string(),
                destination: Some("P1".to_string()),
            },
        },
        BusMessage::PerformAck { unit: "M1".to_string() },
        BusMessage::Complete { unit: "M1".to_string() },
        BusMessage::CompleteAck { unit: "M1".to_string() },
        BusMessage::Purge,
    ];

    for msg in cases {
        let wire = msg.to_wire().unwrap();
        let json = serde_json::to_string(&wire).unwrap();
        let decoded_wire: crate::protocol::WireMessage = serde_json::from_str(&json).unwrap();
        let decoded = BusMessage::from_wire(&decoded_wire).unwrap();
        assert_eq!(decoded, msg, "round trip mismatch for {json}");
    }
}

#[test]
fn interaction_url_bijection_is_case_insensitive() {
    for interaction in Interaction::ALL {
        let url = interaction.to_url();
        assert_eq!(Interaction::from_url(url).unwrap(), interaction);
        assert_eq!(Interaction::from_url(&url.to_ascii_uppercase()).unwrap(), interaction);
    }
}

#[test]
fn create_session_retries_exactly_n_times_then_fails() {
    let (engine_end, broker_end) = channel_pair();
    // Broker end never acknowledges anything — drop it immediately so the
    // channel stays open but no replies ever arrive.
    drop(broker_end.outbound);

    let session = CreateSession::new(&engine_end.outbound, &engine_end.inbound, 3, Duration::from_millis(5));
    let start = std::time::Instant::now();
    let result = session.run(&[create_payload("M1")]);
    let elapsed = start.elapsed();

    assert!(result.is_err());
    // 3 attempts spaced ~5ms apart: at least 2 full waits elapse (the 3rd
    // attempt's wait also elapses before giving up).
    assert!(elapsed >= Duration::from_millis(14), "elapsed={elapsed:?}");
}

#[test]
fn create_session_succeeds_on_matching_ack() {
    let (engine_end, broker_end) = channel_pair();

    let handle = thread::spawn(move || {
        let BusMessage::Create(payload) = broker_end.inbound.recv().unwrap() else {
            panic!("expected Create");
        };
        broker_end
            .outbound
            .publish(BusMessage::CreateAck(AcknowledgePayload { name: payload.name }))
            .unwrap();
    });

    let session = CreateSession::new(&engine_end.outbound, &engine_end.inbound, 10, Duration::from_millis(500));
    session.run(&[create_payload("M1")]).unwrap();
    handle.join().unwrap();
}

#[test]
fn complete_session_retries_exactly_n_times_then_fails() {
    let (engine_end, broker_end) = channel_pair();
    drop(broker_end.outbound);

    let session = CompleteSession::new(&engine_end.outbound, &engine_end.inbound, 4, Duration::from_millis(5));
    let result = session.run("M1");
    assert!(result.is_err());
}

#[test]
fn dummy_broker_acknowledges_create_immediately() {
    let (engine_end, broker_end) = channel_pair();
    let mut dummy = DummyBroker::new(Box::new(broker_end.outbound), broker_end.inbound);

    dummy.handle_create(&create_payload("M1")).unwrap();
    let BusMessage::CreateAck(ack) = engine_end.inbound.recv_timeout(Duration::from_millis(50)).unwrap()
    else {
        panic!("expected CreateAck");
    };
    assert_eq!(ack.name, "M1");
}

#[test]
fn dummy_broker_drives_one_step_end_to_end() {
    let (engine_end, broker_end) = channel_pair();
    let mut dummy = DummyBroker::new(Box::new(broker_end.outbound), broker_end.inbound);

    dummy.enqueue(PendingStep {
        unit: "P1".to_string(),
        service_requester: "M1".to_string(),
        interaction_url: Interaction::PlaceHousing.to_url().to_string(),
        destination: None,
    });

    // Step 1: broker requests cost.
    dummy.drive().unwrap();
    let BusMessage::RequestCost { unit, payload } =
        engine_end.inbound.recv_timeout(Duration::from_millis(50)).unwrap()
    else {
        panic!("expected RequestCost");
    };
    assert_eq!(unit, "P1");
    assert_eq!(payload.service_requester, "M1");

    // Engine answers with a nonzero cost.
    engine_end
        .outbound
        .publish(BusMessage::ResponseCost { unit: "P1".to_string(), payload: ResponseCostPayload { cost: 12 } })
        .unwrap();

    // Step 2: broker sends Perform, engine acknowledges.
    dummy.drive_blocking(Duration::from_millis(50)).unwrap();
    let BusMessage::Perform { unit, .. } =
        engine_end.inbound.recv_timeout(Duration::from_millis(50)).unwrap()
    else {
        panic!("expected Perform");
    };
    engine_end.outbound.publish(BusMessage::PerformAck { unit: unit.clone() }).unwrap();

    dummy.drive_blocking(Duration::from_millis(50)).unwrap();

    // Engine finishes the task and emits Complete; broker acknowledges.
    engine_end.outbound.publish(BusMessage::Complete { unit: unit.clone() }).unwrap();
    dummy.drive_blocking(Duration::from_millis(50)).unwrap();

    let BusMessage::CompleteAck { unit: acked } =
        engine_end.inbound.recv_timeout(Duration::from_millis(50)).unwrap()
    else {
        panic!("expected CompleteAck");
    };
    assert_eq!(acked, unit);
    assert_eq!(dummy.pending_len(), 0);
}

#[test]
fn purge_round_trip_is_idempotent() {
    let wire = BusMessage::Purge.to_wire().unwrap();
    let decoded_once = BusMessage::from_wire(&wire).unwrap();
    let decoded_twice = BusMessage::from_wire(&BusMessage::from_wire(&wire).unwrap().to_wire().unwrap()).unwrap();
    assert_eq!(decoded_once, BusMessage::Purge);
    assert_eq!(decoded_twice, BusMessage::Purge);
}
