use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use routed_rust::message::headers;
use routed_rust::producer::{negative_random, positive_sequence, ProducerThread, SequenceCounter};
use routed_rust::FlowConfig;

use crate::support::flow;

#[test]
fn gateway_clones_share_one_flow() {
    let (flow, probe) = flow(FlowConfig::default());

    let handles: Vec<_> = (0..4i64)
        .map(|t| {
            let gateway = flow.gateway().clone();
            thread::spawn(move || {
                for i in -25..25 {
                    gateway.send_number(i * 4 + t).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let sent: Vec<i64> = (0..4)
        .flat_map(|t| (-25..25).map(move |i| i * 4 + t))
        .collect();
    let mut discarded = probe.discarded_payloads();
    discarded.sort();
    let mut expected: Vec<i64> = sent.iter().copied().filter(|n| *n < 0).collect();
    expected.sort();

    assert_eq!(discarded, expected);
    assert_eq!(probe.displayed_texts().len(), sent.len() - expected.len());
    assert_eq!(probe.tapped_payloads().len(), sent.len());

    let ids: HashSet<String> = probe
        .discarded
        .lock()
        .unwrap()
        .iter()
        .filter_map(|m| m.header_str(headers::MESSAGE_ID).map(str::to_string))
        .collect();
    assert_eq!(ids.len(), expected.len());
}

#[test]
fn parallel_fanout_delivers_to_every_subscriber() {
    let (flow, probe) = flow(
        FlowConfig::default()
            .with_parallel_fanout(true)
            .with_failure_on_multiple_of(8),
    );

    for n in [2, 4, 8, -6] {
        flow.gateway().send_number(n).unwrap();
    }

    assert_eq!(*probe.even_activator.lock().unwrap(), vec![2, 4, 8, -6]);
    assert_eq!(probe.displayed_texts(), vec!["Number 2", "Number 4"]);
    assert_eq!(probe.dead_letter_payloads(), vec![8]);
    assert_eq!(probe.discarded_payloads(), vec![-6]);
}

#[test]
fn producer_threads_feed_the_flow() {
    let (flow, probe) = flow(FlowConfig::default());
    let counter = SequenceCounter::new();

    let positives = ProducerThread::spawn(
        flow.gateway().clone(),
        Duration::from_millis(5),
        positive_sequence(counter.clone()),
    );
    let negatives = ProducerThread::spawn_with_name(
        flow.gateway().clone(),
        Duration::from_millis(5),
        negative_random(1..=100),
        "negatives",
    );

    thread::sleep(Duration::from_millis(50));
    let positive_stats = positives.stop();
    let negative_stats = negatives.stop();

    assert_eq!(positive_stats.failed, 0);
    assert_eq!(negative_stats.failed, 0);
    assert_eq!(positive_stats.sent as i64, counter.current());
    assert_eq!(probe.displayed_texts().len(), positive_stats.sent);
    assert_eq!(probe.discarded_payloads().len(), negative_stats.sent);
    assert!(probe.discarded_payloads().iter().all(|n| *n < 0));
}
