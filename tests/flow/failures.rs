use routed_rust::message::headers;
use routed_rust::stage::DEFAULT_DEAD_LETTER_CHANNEL;
use routed_rust::{FlowConfig, NumberFlow};

use crate::support::{flow, init_tracing, Probe};

/// A flow whose display sink panics for the given text.
fn broken_display(broken_for: &'static str) -> (NumberFlow, Probe) {
    init_tracing();
    let probe = Probe::default();
    let displayed = std::sync::Arc::clone(&probe.displayed);
    let flow = probe
        .attach(NumberFlow::builder(FlowConfig::default()))
        .on_display(move |flow, text| {
            if text == broken_for {
                panic!("display device broken");
            }
            displayed
                .lock()
                .unwrap()
                .push((flow.to_string(), text.to_string()));
        })
        .build()
        .unwrap();
    (flow, probe)
}

#[test]
fn handler_failure_reaches_dead_letter_once() {
    let (flow, probe) = flow(FlowConfig::default().with_failure_on_multiple_of(8));

    flow.gateway().send_number(16).unwrap();

    let letters = probe.dead_letters.lock().unwrap();
    assert_eq!(letters.len(), 1);
    let letter = &letters[0];
    assert_eq!(letter.payload, 16);
    assert!(letter.is_failure());
    assert!(!letter.cause.as_deref().unwrap_or_default().is_empty());
    assert_eq!(letter.failed_stage.as_deref(), Some("even-handler"));
    assert_eq!(letter.headers.get(headers::SOURCE_FLOW), Some(&"even".into()));
    assert!(probe.displayed_texts().is_empty());
}

#[test]
fn failing_subscriber_does_not_starve_its_sibling() {
    let (flow, probe) = flow(FlowConfig::default().with_failure_on_multiple_of(8));

    flow.gateway().send_number(16).unwrap();

    assert_eq!(*probe.even_activator.lock().unwrap(), vec![16]);
}

#[test]
fn only_matching_numbers_fail() {
    let (flow, probe) = flow(FlowConfig::default().with_failure_on_multiple_of(8));

    for n in [4, 8, 12, 16, 3, -8] {
        flow.gateway().send_number(n).unwrap();
    }

    // -8 is rejected by the filter before the handler runs.
    assert_eq!(probe.dead_letter_payloads(), vec![8, 16]);
    assert_eq!(
        probe.displayed_texts(),
        vec!["Number 4", "Number 12", "Number 3"]
    );
    assert_eq!(probe.discarded_payloads(), vec![-8]);
}

#[test]
fn odd_handler_never_simulates_failures() {
    let (flow, probe) = flow(FlowConfig::default().with_failure_on_multiple_of(3));

    flow.gateway().send_number(9).unwrap();
    flow.gateway().send_number(6).unwrap();

    assert_eq!(probe.displayed_texts(), vec!["Number 9"]);
    assert_eq!(probe.dead_letter_payloads(), vec![6]);
}

#[test]
fn renamed_dead_letter_channel_receives_failures() {
    let config = FlowConfig::default()
        .with_failure_on_multiple_of(2)
        .with_dead_letter_channel("failures");
    let (flow, probe) = flow(config);

    flow.gateway().send_number(2).unwrap();

    assert!(!flow.registry().contains(DEFAULT_DEAD_LETTER_CHANNEL));
    assert_eq!(probe.dead_letter_payloads(), vec![2]);
    assert_eq!(
        probe.dead_letters.lock().unwrap()[0]
            .headers
            .get(headers::ERROR_CHANNEL),
        Some(&"failures".into())
    );
}

#[test]
fn panicking_handler_on_direct_channel_is_dead_lettered() {
    let (flow, probe) = broken_display("Number 3");

    flow.send_number(3).unwrap();
    flow.send_number(5).unwrap();

    let letters = probe.dead_letters.lock().unwrap();
    assert_eq!(letters.len(), 1);
    assert_eq!(letters[0].payload, 3);
    assert_eq!(
        letters[0].cause.as_deref(),
        Some("handler panicked: display device broken")
    );
    assert_eq!(letters[0].failed_stage.as_deref(), Some("odd-handler"));
    assert_eq!(probe.displayed_texts(), vec!["Number 5"]);
}

#[test]
fn panicking_handler_on_publish_subscribe_channel_is_dead_lettered() {
    let (flow, probe) = broken_display("Number 4");

    flow.send_number(4).unwrap();

    assert_eq!(probe.dead_letter_payloads(), vec![4]);
    assert_eq!(
        probe.dead_letters.lock().unwrap()[0].failed_stage.as_deref(),
        Some("even-handler")
    );
    // The sibling subscriber on the even channel is unaffected.
    assert_eq!(*probe.even_activator.lock().unwrap(), vec![4]);
}
