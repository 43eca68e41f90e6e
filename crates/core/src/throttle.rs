//! Trailing-edge throttling for continuous controls such as fader drags.
//!
//! [`Throttle`] only decides; [`ThrottledSender`] carries the decision out on
//! the tokio runtime, keeping the abort handle of the scheduled send so the
//! next event can replace it. The last value is always sent eventually.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::trace;

pub const THROTTLE_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    SendNow,
    /// Schedule the send this far in the future, replacing any earlier one.
    Defer(Duration),
}

#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_sent: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sent: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn decide(&self, now: Instant) -> Decision {
        match self.last_sent {
            Some(last) if now.saturating_duration_since(last) < self.interval => {
                Decision::Defer(self.interval)
            }
            _ => Decision::SendNow,
        }
    }

    pub fn mark_sent(&mut self, now: Instant) {
        self.last_sent = Some(now);
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(THROTTLE_INTERVAL)
    }
}

struct SenderState<T> {
    throttle: Throttle,
    scheduled: Option<AbortHandle>,
    last_value: Option<T>,
    /// Bumped by every event; a scheduled send only fires if it is still current.
    generation: u64,
}

impl<T> SenderState<T> {
    fn cancel_scheduled(&mut self) {
        if let Some(handle) = self.scheduled.take() {
            handle.abort();
        }
    }
}

/// Throttled delivery of values through an async `send` function.
///
/// Must be used from within a tokio runtime.
pub struct ThrottledSender<T, F> {
    state: Arc<Mutex<SenderState<T>>>,
    send: Arc<F>,
}

impl<T, F, Fut> ThrottledSender<T, F>
where
    T: Clone + PartialEq + Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    pub fn new(throttle: Throttle, send: F) -> Self {
        Self {
            state: Arc::new(Mutex::new(SenderState {
                throttle,
                scheduled: None,
                last_value: None,
                generation: 0,
            })),
            send: Arc::new(send),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SenderState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Feed one drag update.
    pub fn push(&self, value: T) {
        let mut state = self.lock();
        state.cancel_scheduled();
        state.generation += 1;

        let now = Instant::now();
        match state.throttle.decide(now) {
            Decision::SendNow => {
                state.throttle.mark_sent(now);
                state.last_value = Some(value.clone());
                drop(state);
                self.dispatch(value);
            }
            Decision::Defer(delay) => {
                trace!(?delay, "throttled, scheduling send");
                let generation = state.generation;
                let shared = Arc::clone(&self.state);
                let send = Arc::clone(&self.send);

                let task = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    {
                        let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
                        if state.generation != generation {
                            return;
                        }
                        state.scheduled = None;
                        state.throttle.mark_sent(Instant::now());
                        state.last_value = Some(value.clone());
                    }
                    send(value).await;
                });
                state.scheduled = Some(task.abort_handle());
            }
        }
    }

    /// End of a drag: send `value` now unless it is what was last sent.
    pub fn release(&self, value: T) {
        let mut state = self.lock();
        state.cancel_scheduled();
        state.generation += 1;

        if state.last_value.as_ref() == Some(&value) {
            return;
        }
        state.throttle.mark_sent(Instant::now());
        state.last_value = Some(value.clone());
        drop(state);
        self.dispatch(value);
    }

    pub fn is_scheduled(&self) -> bool {
        self.lock().scheduled.is_some()
    }

    fn dispatch(&self, value: T) {
        let send = Arc::clone(&self.send);
        tokio::spawn(async move { send(value).await });
    }
}
