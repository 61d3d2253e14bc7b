//! Recording sinks for the number flow.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use routed_rust::{DeadLetter, FlowConfig, Message, NumberFlow, NumberFlowBuilder};
use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness. `RUST_LOG` overrides
/// the default `warn` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Everything the flow's sinks received, in arrival order.
#[derive(Clone, Default)]
pub struct Probe {
    pub displayed: Arc<Mutex<Vec<(String, String)>>>,
    pub even_activator: Arc<Mutex<Vec<i64>>>,
    pub discarded: Arc<Mutex<Vec<Message<i64>>>>,
    pub dead_letters: Arc<Mutex<Vec<DeadLetter<i64>>>>,
    pub tapped: Arc<Mutex<Vec<Message<i64>>>>,
}

impl Probe {
    /// Attach every sink of `builder` to this probe.
    pub fn attach(&self, builder: NumberFlowBuilder) -> NumberFlowBuilder {
        let displayed = Arc::clone(&self.displayed);
        let even_activator = Arc::clone(&self.even_activator);
        let discarded = Arc::clone(&self.discarded);
        let dead_letters = Arc::clone(&self.dead_letters);
        let tapped = Arc::clone(&self.tapped);

        builder
            .on_display(move |flow, text| {
                displayed
                    .lock()
                    .unwrap()
                    .push((flow.to_string(), text.to_string()))
            })
            .on_even_activator(move |n| even_activator.lock().unwrap().push(n))
            .on_discard(move |m| discarded.lock().unwrap().push(m.clone()))
            .on_dead_letter(move |letter| dead_letters.lock().unwrap().push(letter))
            .on_tap(move |m| tapped.lock().unwrap().push(m.clone()))
    }

    pub fn displayed_texts(&self) -> Vec<String> {
        self.displayed
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn discarded_payloads(&self) -> Vec<i64> {
        self.discarded
            .lock()
            .unwrap()
            .iter()
            .map(|m| *m.payload())
            .collect()
    }

    pub fn dead_letter_payloads(&self) -> Vec<i64> {
        self.dead_letters
            .lock()
            .unwrap()
            .iter()
            .map(|l| l.payload)
            .collect()
    }

    pub fn tapped_payloads(&self) -> Vec<i64> {
        self.tapped
            .lock()
            .unwrap()
            .iter()
            .map(|m| *m.payload())
            .collect()
    }
}

/// Build a flow whose sinks all record into a fresh probe.
pub fn flow(config: FlowConfig) -> (NumberFlow, Probe) {
    init_tracing();
    let probe = Probe::default();
    let flow = probe
        .attach(NumberFlow::builder(config))
        .build()
        .expect("flow wiring");
    (flow, probe)
}
