//! Reference-counted polling store fanning price updates out to consumers
//!
//! One polling task runs per distinct refresh interval, no matter how many
//! subscribers share it. The first subscriber for an interval starts the
//! task (which fetches immediately, then on every tick); the last one to
//! leave tears it down. Poll errors are delivered alongside the last known
//! good price list, so a consumer never flashes to empty on a transient
//! blip.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::client::PriceSource;
use crate::error::ApiError;
use crate::model::TokenPrice;

/// What every subscriber receives on each push.
#[derive(Clone)]
pub struct PriceUpdate {
    pub prices: Vec<TokenPrice>,
    /// True until the first successful fetch for this interval.
    pub loading: bool,
    pub error: Option<Arc<ApiError>>,
}

impl PriceUpdate {
    fn initial() -> Self {
        PriceUpdate {
            prices: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

type Callback = Arc<dyn Fn(PriceUpdate) + Send + Sync>;

pub struct PricePollingStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    source: Arc<dyn PriceSource>,
    intervals: Mutex<HashMap<u64, IntervalState>>,
    next_id: AtomicU64,
}

struct IntervalState {
    subscribers: HashMap<u64, Callback>,
    snapshot: PriceUpdate,
    task: JoinHandle<()>,
}

impl PricePollingStore {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        PricePollingStore {
            inner: Arc::new(StoreInner {
                source,
                intervals: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Registers a callback for the given refresh interval.
    ///
    /// The callback immediately receives the current snapshot for that
    /// interval (loading until the first successful fetch), then one push
    /// per completed poll. Dropping the returned handle unsubscribes.
    pub fn subscribe(
        &self,
        interval: Duration,
        callback: impl Fn(PriceUpdate) + Send + Sync + 'static,
    ) -> SubscriptionHandle {
        let interval_ms = interval.as_millis() as u64;
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Callback = Arc::new(callback);

        let snapshot = {
            let mut intervals = self.inner.intervals.lock().unwrap();
            let state = intervals.entry(interval_ms).or_insert_with(|| {
                debug!("Starting poll task for {}ms interval", interval_ms);
                let task = tokio::spawn(poll_loop(self.inner.clone(), interval_ms));
                IntervalState {
                    subscribers: HashMap::new(),
                    snapshot: PriceUpdate::initial(),
                    task,
                }
            });
            state.subscribers.insert(id, callback.clone());
            state.snapshot.clone()
        };

        callback(snapshot);

        SubscriptionHandle {
            inner: self.inner.clone(),
            interval_ms,
            id,
            active: true,
        }
    }

    /// Channel-flavored subscription for consumers driven by a receive loop.
    pub fn subscribe_channel(
        &self,
        interval: Duration,
    ) -> (SubscriptionHandle, mpsc::UnboundedReceiver<PriceUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = self.subscribe(interval, move |update| {
            let _ = tx.send(update);
        });
        (handle, rx)
    }
}

async fn poll_loop(inner: Arc<StoreInner>, interval_ms: u64) {
    let in_flight = Arc::new(AtomicBool::new(false));
    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;

        // A fetch still running from the previous tick coalesces this one.
        if in_flight.swap(true, Ordering::SeqCst) {
            debug!("Poll for {}ms interval still in flight, skipping tick", interval_ms);
            continue;
        }

        // The fetch runs as its own task so a slow remote call never blocks
        // the ticker. If every subscriber leaves mid-flight, the fetch still
        // completes and warms the client caches; its result simply goes
        // undelivered.
        let inner = inner.clone();
        let in_flight = in_flight.clone();
        tokio::spawn(async move {
            let result = inner.source.get_all_token_prices().await;
            in_flight.store(false, Ordering::SeqCst);
            inner.publish(interval_ms, result);
        });
    }
}

impl StoreInner {
    fn publish(&self, interval_ms: u64, result: Result<Vec<TokenPrice>, ApiError>) {
        let (subscribers, update) = {
            let mut intervals = self.intervals.lock().unwrap();
            let Some(state) = intervals.get_mut(&interval_ms) else {
                return;
            };

            match result {
                Ok(prices) => {
                    state.snapshot = PriceUpdate {
                        prices,
                        loading: false,
                        error: None,
                    };
                }
                Err(err) => {
                    // Stale-but-shown: keep the last good list visible.
                    warn!(error = %err, "Poll failed; keeping last known prices");
                    state.snapshot.loading = false;
                    state.snapshot.error = Some(Arc::new(err));
                }
            }

            let subscribers: Vec<Callback> = state.subscribers.values().cloned().collect();
            (subscribers, state.snapshot.clone())
        };

        // Callbacks run outside the lock so a subscriber may re-enter the
        // store (e.g. subscribe again) without deadlocking.
        for callback in subscribers {
            callback(update.clone());
        }
    }

    fn unsubscribe(&self, interval_ms: u64, id: u64) {
        let mut intervals = self.intervals.lock().unwrap();
        let Some(state) = intervals.get_mut(&interval_ms) else {
            return;
        };
        state.subscribers.remove(&id);
        if state.subscribers.is_empty() {
            debug!("Last subscriber left, stopping poll task for {}ms interval", interval_ms);
            if let Some(state) = intervals.remove(&interval_ms) {
                state.task.abort();
            }
        }
    }
}

/// Active subscription. Unsubscribes on drop; when the last handle for an
/// interval goes away, that interval's poll task is cancelled.
pub struct SubscriptionHandle {
    inner: Arc<StoreInner>,
    interval_ms: u64,
    id: u64,
    active: bool,
}

impl SubscriptionHandle {
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.inner.unsubscribe(self.interval_ms, self.id);
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
