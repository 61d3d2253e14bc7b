use routed_rust::{
    EventOutcome, FlowConfig, NumberFlow, RecordingObserver, StageEvent, StageKind,
    TracingObserver,
};

use crate::support::{init_tracing, Probe};

fn observed(config: FlowConfig, observer: RecordingObserver) -> (NumberFlow, Probe) {
    init_tracing();
    let probe = Probe::default();
    let flow = probe
        .attach(NumberFlow::builder(config))
        .observer(observer)
        .observer(TracingObserver::new())
        .build()
        .unwrap();
    (flow, probe)
}

#[test]
fn every_stage_reports_its_outcome() {
    let recorder = RecordingObserver::new();
    let (flow, _probe) = observed(FlowConfig::default(), recorder.clone());

    flow.gateway().send_number(4).unwrap();

    let routes = recorder.of_kind(StageKind::Route);
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].forwarded_to(), Some("even"));

    let taps = recorder.of_kind(StageKind::Tap);
    assert_eq!(taps.len(), 1);
    assert_eq!(taps[0].forwarded_to(), Some("wire-tap-input"));
    assert_eq!(taps[0].channel, "numbers");

    let enrich = recorder.of_kind(StageKind::Enrich);
    assert_eq!(enrich.len(), 1);
    assert_eq!(enrich[0].outcome, EventOutcome::Continued);
    assert!(enrich[0].headers.contains_key("messageId"));

    let filters = recorder.of_kind(StageKind::Filter);
    assert_eq!(filters.len(), 1);
    assert_eq!(filters[0].outcome, EventOutcome::Continued);

    let handled: Vec<String> = recorder
        .on_channel("even")
        .into_iter()
        .filter(|e| e.kind == StageKind::Handle)
        .map(|e| e.stage)
        .collect();
    assert_eq!(handled, vec!["even-handler", "even-service-activator"]);
}

#[test]
fn rejections_and_failures_are_observable() {
    let recorder = RecordingObserver::new();
    let (flow, _probe) = observed(
        FlowConfig::default().with_failure_on_multiple_of(8),
        recorder.clone(),
    );

    flow.gateway().send_number(-3).unwrap();
    flow.gateway().send_number(8).unwrap();

    let rejected: Vec<StageEvent> = recorder
        .of_kind(StageKind::Filter)
        .into_iter()
        .filter(|e| e.forwarded_to() == Some("discard"))
        .collect();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].payload, serde_json::json!(-3));

    let captured: Vec<StageEvent> = recorder
        .events()
        .into_iter()
        .filter(|e| e.stage == "even-handler")
        .collect();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].forwarded_to(), Some("dead-letter"));
    assert!(captured[0].headers.contains_key("errorCause"));

    let letters = recorder.of_kind(StageKind::DeadLetter);
    assert_eq!(letters.len(), 1);
    assert_eq!(letters[0].outcome, EventOutcome::Completed);
    assert_eq!(letters[0].payload, serde_json::json!(8));
}

#[cfg(feature = "emitter")]
#[test]
fn emitter_observer_publishes_json_events() {
    use routed_rust::observe::{EmitterObserver, ALL_EVENTS};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    init_tracing();
    let emitter = EmitterObserver::new();
    let all = Arc::new(Mutex::new(Vec::new()));
    let letters = Arc::new(Mutex::new(Vec::new()));
    {
        let all = Arc::clone(&all);
        emitter.on(ALL_EVENTS, move |json| all.lock().unwrap().push(json));
        let letters = Arc::clone(&letters);
        emitter.on("dead_letter", move |json| letters.lock().unwrap().push(json));
    }

    let flow = NumberFlow::builder(FlowConfig::default().with_failure_on_multiple_of(8))
        .on_display(|_, _| {})
        .on_dead_letter(|_| {})
        .observer(emitter)
        .build()
        .unwrap();
    flow.gateway().send_number(16).unwrap();

    // Emitter listeners run on their own threads.
    thread::sleep(Duration::from_millis(50));

    assert!(!all.lock().unwrap().is_empty());
    let letters = letters.lock().unwrap();
    assert_eq!(letters.len(), 1);
    let event: StageEvent = serde_json::from_str(&letters[0]).unwrap();
    assert_eq!(event.kind, StageKind::DeadLetter);
    assert_eq!(event.payload, serde_json::json!(16));
}
