/// Debounced geometry persistence.
///
/// Window-change notifications restart a single countdown; when the quiet
/// period passes without another notification the latest geometry is read
/// from the host and written to the store. Bursts of events therefore produce
/// exactly one write, issued one quiet period after the last event.
///
/// The countdown runs on a dedicated worker thread fed over a channel, so the
/// UI event loop never blocks on store I/O.
use crate::geometry::{GeometryStore, WindowKey};
use crate::host::GeometrySource;
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Quiet period between the last window change and the write
pub const QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Longest time a forced flush waits for the worker. The flush runs on the
/// UI thread during close, so this bounds how long closing can stall.
const FLUSH_TIMEOUT: Duration = Duration::from_millis(250);

/// Single-slot countdown that restarts on every touch
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Cancel any pending deadline and schedule a new one at `now + delay`
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline; `None` when idle
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Returns true once when the deadline has passed, clearing it
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

enum Signal {
    Notify,
    Flush(Sender<()>),
    Shutdown,
}

/// Runs an action once per burst of notifications
pub struct DebouncedAction {
    tx: Sender<Signal>,
    worker: Option<JoinHandle<()>>,
}

impl DebouncedAction {
    pub fn spawn<F>(delay: Duration, action: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (tx, rx) = channel::unbounded();
        let worker = std::thread::Builder::new()
            .name("geometry-debounce".into())
            .spawn(move || run_worker(delay, rx, action));

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                // Without a worker notifications are dropped; the window keeps working
                tracing::error!("Failed to start debounce worker: {}", e);
                None
            }
        };

        Self { tx, worker }
    }

    /// Restart the quiet period
    pub fn notify(&self) {
        let _ = self.tx.send(Signal::Notify);
    }

    /// Cancel the pending countdown and run the action now, waiting for it
    pub fn flush_now(&self) {
        let (ack_tx, ack_rx) = channel::bounded(1);
        if self.tx.send(Signal::Flush(ack_tx)).is_err() {
            return;
        }
        if ack_rx.recv_timeout(FLUSH_TIMEOUT).is_err() {
            tracing::warn!("Timed out waiting for geometry flush");
        }
    }
}

impl Drop for DebouncedAction {
    fn drop(&mut self) {
        let _ = self.tx.send(Signal::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_worker<F: FnMut()>(delay: Duration, rx: Receiver<Signal>, mut action: F) {
    let mut timer = DebounceTimer::new(delay);

    loop {
        let signal = match timer.remaining(Instant::now()) {
            None => rx.recv().ok(),
            Some(wait) => match rx.recv_timeout(wait) {
                Ok(signal) => Some(signal),
                Err(RecvTimeoutError::Timeout) => {
                    if timer.fire_if_due(Instant::now()) {
                        action();
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => None,
            },
        };

        match signal {
            Some(Signal::Notify) => timer.touch(Instant::now()),
            Some(Signal::Flush(ack)) => {
                timer.cancel();
                action();
                let _ = ack.send(());
            }
            Some(Signal::Shutdown) | None => break,
        }
    }
}

/// Debounced writer of one window's geometry
pub struct PersistenceScheduler {
    action: DebouncedAction,
}

impl PersistenceScheduler {
    pub fn new<S>(store: Arc<dyn GeometryStore>, key: WindowKey, source: S) -> Self
    where
        S: GeometrySource,
    {
        Self::with_delay(QUIET_PERIOD, store, key, source)
    }

    pub fn with_delay<S>(
        delay: Duration,
        store: Arc<dyn GeometryStore>,
        key: WindowKey,
        source: S,
    ) -> Self
    where
        S: GeometrySource,
    {
        let action = DebouncedAction::spawn(delay, move || {
            persist_current(store.as_ref(), &key, &source);
        });
        Self { action }
    }

    /// A window geometry change happened
    pub fn notify(&self) {
        self.action.notify();
    }

    /// Write the current geometry immediately (window closing)
    pub fn flush_now(&self) {
        self.action.flush_now();
    }
}

fn persist_current(store: &dyn GeometryStore, key: &WindowKey, source: &impl GeometrySource) {
    let Some(geometry) = source.current_geometry() else {
        tracing::debug!("No geometry available for {}, skipping save", key.as_str());
        return;
    };

    match store.save(key, geometry) {
        Ok(()) => tracing::debug!("Persisted geometry for {}", key.as_str()),
        Err(e) => tracing::warn!("Failed to save window geometry: {}", e),
    }
}
