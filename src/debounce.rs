// Debounce helpers for bursty UI events such as scrolling

use std::time::{Duration, Instant};
use tokio::sync::mpsc;

// Poll-driven debouncer for hosts that tick with their own clock.
// `ready` reports true once per burst, after `quiet` has passed since the
// last observed event.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_event: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    pub fn observe(&mut self, now: Instant) {
        self.last_event = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_event.is_some()
    }

    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last_event {
            Some(last) if now.saturating_duration_since(last) >= self.quiet => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }
}

// Forwards only the last value of each burst, once `quiet` has elapsed
// without a newer one. Closing the input flushes whatever is pending;
// dropping the output stops the task.
pub fn debounced<T>(mut input: mpsc::Receiver<T>, quiet: Duration) -> mpsc::Receiver<T>
where
    T: Send + 'static,
{
    let (tx, output) = mpsc::channel(1);

    tokio::spawn(async move {
        let mut pending: Option<T> = None;
        loop {
            match pending.take() {
                None => tokio::select! {
                    next = input.recv() => match next {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    _ = tx.closed() => break,
                },
                Some(value) => {
                    tokio::select! {
                        next = input.recv() => match next {
                            Some(newer) => pending = Some(newer),
                            None => {
                                let _ = tx.send(value).await;
                                break;
                            }
                        },
                        _ = tokio::time::sleep(quiet) => {
                            if tx.send(value).await.is_err() {
                                break;
                            }
                        }
                        _ = tx.closed() => break,
                    }
                }
            }
        }
    });

    output
}
