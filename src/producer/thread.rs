//! Threaded number producer.

use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::gateway::Gateway;

/// Statistics from a producer thread.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProducerStats {
    pub sent: usize,
    pub failed: usize,
}

impl ProducerStats {
    pub fn attempted(&self) -> usize {
        self.sent + self.failed
    }
}

/// A background thread that sends one number per interval through a gateway.
///
/// Send errors are logged and counted; they never stop the thread.
pub struct ProducerThread {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<ProducerStats>>,
}

impl ProducerThread {
    /// Spawn a producer calling `next` for every number it sends.
    ///
    /// The first number is sent immediately, then one per `interval`.
    pub fn spawn<F>(gateway: Gateway<i64>, interval: Duration, next: F) -> Self
    where
        F: FnMut() -> i64 + Send + 'static,
    {
        Self::spawn_with_name(gateway, interval, next, "producer")
    }

    /// Spawn a producer whose log lines carry `name`.
    pub fn spawn_with_name<F>(
        gateway: Gateway<i64>,
        interval: Duration,
        mut next: F,
        name: &str,
    ) -> Self
    where
        F: FnMut() -> i64 + Send + 'static,
    {
        let (stop_tx, stop_rx) = channel();
        let name = name.to_string();

        let handle = thread::spawn(move || {
            let mut stats = ProducerStats::default();

            loop {
                let n = next();
                match gateway.send_number(n) {
                    Ok(()) => stats.sent += 1,
                    Err(err) => {
                        warn!(producer = %name, payload = n, error = %err, "send failed");
                        stats.failed += 1;
                    }
                }

                match stop_rx.recv_timeout(interval) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {}
                }
            }

            debug!(producer = %name, sent = stats.sent, failed = stats.failed, "producer stopped");
            stats
        });

        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Signal the producer to stop and wait for it to finish.
    pub fn stop(mut self) -> ProducerStats {
        let _ = self.stop_tx.send(());
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or_default(),
            None => ProducerStats::default(),
        }
    }

    /// Signal the producer to stop without waiting.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(());
    }
}

impl Drop for ProducerThread {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}
