use routed_rust::message::headers;
use routed_rust::FlowConfig;

use crate::support::flow;

#[test]
fn positive_even_is_displayed() {
    let (flow, probe) = flow(FlowConfig::default());

    flow.gateway().send_number(4).unwrap();

    assert_eq!(
        *probe.displayed.lock().unwrap(),
        vec![("even".to_string(), "Number 4".to_string())]
    );
    assert_eq!(*probe.even_activator.lock().unwrap(), vec![4]);
    assert!(probe.discarded_payloads().is_empty());
    assert!(probe.dead_letter_payloads().is_empty());
}

#[test]
fn negative_even_is_discarded() {
    let (flow, probe) = flow(FlowConfig::default());

    flow.gateway().send_number(-4).unwrap();

    assert_eq!(probe.discarded_payloads(), vec![-4]);
    assert!(probe.displayed_texts().is_empty());
    // The raw even subscriber sees every even number.
    assert_eq!(*probe.even_activator.lock().unwrap(), vec![-4]);
}

#[test]
fn positive_odd_is_displayed() {
    let (flow, probe) = flow(FlowConfig::default());

    flow.gateway().send_number(3).unwrap();

    assert_eq!(
        *probe.displayed.lock().unwrap(),
        vec![("odd".to_string(), "Number 3".to_string())]
    );
    assert!(probe.even_activator.lock().unwrap().is_empty());
}

#[test]
fn negative_odd_is_discarded() {
    let (flow, probe) = flow(FlowConfig::default());

    flow.gateway().send_number(-3).unwrap();

    assert_eq!(probe.discarded_payloads(), vec![-3]);
    assert!(probe.displayed_texts().is_empty());
}

#[test]
fn zero_is_even_and_accepted() {
    let (flow, probe) = flow(FlowConfig::default());

    flow.gateway().send_number(0).unwrap();

    assert_eq!(probe.displayed_texts(), vec!["Number 0"]);
    assert_eq!(*probe.even_activator.lock().unwrap(), vec![0]);
}

#[test]
fn discarded_messages_carry_enrichment() {
    let (flow, probe) = flow(FlowConfig::default());

    flow.gateway().send_number(-4).unwrap();
    flow.gateway().send_number(-3).unwrap();

    let discarded = probe.discarded.lock().unwrap();
    assert_eq!(discarded.len(), 2);
    assert_eq!(discarded[0].header_str(headers::SOURCE_FLOW), Some("even"));
    assert_eq!(discarded[1].header_str(headers::SOURCE_FLOW), Some("odd"));
    for message in discarded.iter() {
        assert!(message.has_header(headers::MESSAGE_ID));
        assert!(message.has_header(headers::PROCESSED_AT));
        assert_eq!(message.header_str(headers::ERROR_CHANNEL), Some("dead-letter"));
    }
}

#[test]
fn wire_tap_sees_every_message_unenriched() {
    let (flow, probe) = flow(FlowConfig::default());
    let sent = [4, -4, 3, -3, 0, 16];

    for n in sent {
        flow.gateway().send_number(n).unwrap();
    }

    assert_eq!(probe.tapped_payloads(), sent.to_vec());
    for message in probe.tapped.lock().unwrap().iter() {
        assert!(message.headers().is_empty());
    }
}

#[test]
fn discard_set_equals_rejected_set() {
    let (flow, probe) = flow(FlowConfig::default());

    for n in -10..=10 {
        flow.gateway().send_number(n).unwrap();
    }

    assert_eq!(probe.discarded_payloads(), (-10..0).collect::<Vec<_>>());
    assert_eq!(
        probe.displayed_texts(),
        (0..=10).map(|n| format!("Number {}", n)).collect::<Vec<_>>()
    );
    assert_eq!(
        *probe.even_activator.lock().unwrap(),
        (-10..=10).filter(|n| n % 2 == 0).collect::<Vec<_>>()
    );
}

#[test]
fn custom_channel_names_are_honored() {
    let config = FlowConfig::from_json(
        r#"{ "input_channel": "ints", "discard_channel": "rejects", "wire_tap_channel": "audit" }"#,
    )
    .unwrap();
    let (flow, probe) = flow(config);

    flow.gateway().send_number(-1).unwrap();

    assert_eq!(flow.gateway().input_channel(), "ints");
    assert!(flow.registry().contains("rejects"));
    assert!(flow.registry().contains("audit"));
    assert_eq!(probe.discarded_payloads(), vec![-1]);
    assert_eq!(probe.tapped_payloads(), vec![-1]);
}
