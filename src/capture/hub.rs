//! This module provides the capture hub: the shared buffer of captured entries
//! and their batched hand-off to a single subscriber.
//!
//! Entries are delivered outside of the call that produced them, on a task
//! spawned onto the tokio runtime, so a subscriber that logs while handling a
//! batch never re-enters itself.
use super::FlushScheduler;
use crate::console::{LogEntry, Severity};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::runtime::Handle;
use tracing::{debug, trace};

/// The default time-of-day pattern for entry timestamps.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// A callback receiving ordered batches of captured entries.
pub type Subscriber = Arc<dyn Fn(Vec<LogEntry>) + Send + Sync>;

struct Registration {
    id: u64,
    callback: Subscriber,
}

/// The shared capture point between every console and the mounted view.
pub struct CaptureHub {
    /// Entries captured but not yet delivered, in call order.
    buffer: Mutex<Vec<LogEntry>>,
    /// The single active subscriber, if any.
    subscriber: Mutex<Option<Registration>>,
    /// Whether a deferred flush is in flight.
    scheduler: FlushScheduler,
    /// Source of registration ids.
    next_id: AtomicU64,
    /// Runtime flushes are spawned on. Falls back to the ambient runtime.
    runtime: Option<Handle>,
    /// Pattern used to stamp new entries.
    time_format: String,
}

impl CaptureHub {
    /// Creates a new `CaptureHub` with the default time format.
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(Vec::new()),
            subscriber: Mutex::new(None),
            scheduler: FlushScheduler::new(),
            next_id: AtomicU64::new(1),
            runtime: None,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }

    /// Sets the `chrono` pattern used for entry timestamps.
    pub fn with_time_format(mut self, time_format: impl Into<String>) -> Self {
        self.time_format = time_format.into();
        self
    }

    /// Pins deferred flushes to the given runtime.
    ///
    /// Without it, flushes are spawned on whichever runtime the producing call
    /// runs in; calls made outside any runtime leave their entries buffered.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Wraps the hub for sharing between consoles, layers and views.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn time_format(&self) -> &str {
        &self.time_format
    }

    /// Stamps and appends a new entry.
    pub fn capture(self: &Arc<Self>, severity: Severity, message: String) {
        let entry = LogEntry::now(severity, message, &self.time_format);
        self.append(entry);
    }

    /// Appends an entry to the buffer and requests a deferred flush.
    ///
    /// The entry is always stored, whether or not anyone is subscribed.
    pub fn append(self: &Arc<Self>, entry: LogEntry) {
        self.lock_buffer().push(entry);
        self.request_flush();
    }

    /// Registers `callback` as the single subscriber.
    ///
    /// Any entries already buffered are handed to the callback before this
    /// returns. A previously registered subscriber is replaced silently.
    ///
    /// # Arguments
    ///
    /// * `callback` - Receives each batch of entries, in call order.
    pub fn attach<F>(self: &Arc<Self>, callback: F) -> Subscription
    where
        F: Fn(Vec<LogEntry>) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Subscriber = Arc::new(callback);

        let replaced = self
            .lock_subscriber()
            .replace(Registration {
                id,
                callback: callback.clone(),
            })
            .is_some();
        if replaced {
            debug!("Replacing active log subscriber with #{}", id);
        }

        let backlog = self.take_buffer();
        if !backlog.is_empty() {
            trace!("Delivering {} buffered entries on attach", backlog.len());
            callback(backlog);
        }

        Subscription {
            hub: Arc::downgrade(self),
            id,
        }
    }

    /// Delivers everything buffered right now, bypassing the scheduler.
    ///
    /// Returns the number of entries delivered; zero when nobody is subscribed.
    pub fn flush_now(&self) -> usize {
        let Some(callback) = self.current_subscriber() else {
            return 0;
        };

        let batch = self.take_buffer();
        let delivered = batch.len();
        if delivered > 0 {
            callback(batch);
        }
        delivered
    }

    /// The number of entries waiting for delivery.
    pub fn pending_len(&self) -> usize {
        self.lock_buffer().len()
    }

    pub fn has_subscriber(&self) -> bool {
        self.lock_subscriber().is_some()
    }

    /// Whether a deferred flush has been scheduled and not yet run.
    pub fn flush_pending(&self) -> bool {
        self.scheduler.is_armed()
    }

    fn detach(&self, id: u64) -> bool {
        let mut slot = self.lock_subscriber();
        match slot.as_ref() {
            Some(registration) if registration.id == id => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    fn is_current(&self, id: u64) -> bool {
        self.lock_subscriber()
            .as_ref()
            .is_some_and(|registration| registration.id == id)
    }

    /// Schedules a flush unless one is already in flight or nobody listens.
    fn request_flush(self: &Arc<Self>) {
        if !self.has_subscriber() || !self.scheduler.try_arm() {
            return;
        }

        // The guard disarms on drop, including when a stopped runtime drops
        // the task unpolled.
        let armed = ArmedFlush {
            hub: Arc::clone(self),
        };
        let Some(handle) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            // No runtime to defer onto; entries wait for attach or a later call.
            return;
        };

        handle.spawn(async move {
            tokio::task::yield_now().await;
            armed.run();
        });
    }

    fn current_subscriber(&self) -> Option<Subscriber> {
        self.lock_subscriber()
            .as_ref()
            .map(|registration| registration.callback.clone())
    }

    fn take_buffer(&self) -> Vec<LogEntry> {
        std::mem::take(&mut *self.lock_buffer())
    }

    fn lock_buffer(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_subscriber(&self) -> MutexGuard<'_, Option<Registration>> {
        self.subscriber.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps the scheduler armed for as long as a scheduled flush is alive.
struct ArmedFlush {
    hub: Arc<CaptureHub>,
}

impl ArmedFlush {
    /// Delivers the buffer, then releases the scheduler.
    ///
    /// The scheduler stays armed while the subscriber runs, so no second flush
    /// can overtake this batch. Entries logged meanwhile get a fresh flush.
    fn run(self) {
        let hub = Arc::clone(&self.hub);
        let Some(callback) = hub.current_subscriber() else {
            // Torn down since scheduling: keep everything for the next subscriber.
            return;
        };

        let batch = hub.take_buffer();
        if !batch.is_empty() {
            callback(batch);
        }

        drop(self);
        if hub.pending_len() > 0 {
            hub.request_flush();
        }
    }
}

impl Drop for ArmedFlush {
    fn drop(&mut self) {
        self.hub.scheduler.disarm();
    }
}

impl Default for CaptureHub {
    fn default() -> Self {
        Self::new()
    }
}

/// The owned handle of an attached subscriber.
///
/// Dropping it detaches the subscriber, unless a later `attach` has already
/// replaced it.
#[must_use = "dropping a Subscription detaches the subscriber immediately"]
pub struct Subscription {
    hub: Weak<CaptureHub>,
    id: u64,
}

impl Subscription {
    /// Detaches explicitly. Equivalent to dropping the handle.
    pub fn detach(self) {}

    /// Whether this handle still owns the hub's subscriber slot.
    pub fn is_current(&self) -> bool {
        self.hub.upgrade().is_some_and(|hub| hub.is_current(self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            if hub.detach(self.id) {
                trace!("Log subscriber #{} detached", self.id);
            }
        }
    }
}
