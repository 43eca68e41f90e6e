//! Background refresh of tracks and transport.
//!
//! One tokio task ticks on a fixed interval, fetches what has a registered
//! callback, and hands the results over. Fetch failures are logged and the
//! next tick proceeds as usual.

use std::sync::Arc;
use std::time::Duration;

use remote_client::{Backend, ClientError, ControlChannel};
use remote_protocol::{Track, TransportState};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

type Callback<T> = Box<dyn Fn(T) + Send + Sync>;

#[derive(Default)]
pub struct PollCallbacks {
    pub on_tracks: Option<Callback<Vec<Track>>>,
    pub on_transport: Option<Callback<TransportState>>,
}

impl PollCallbacks {
    pub fn on_tracks(mut self, callback: impl Fn(Vec<Track>) + Send + Sync + 'static) -> Self {
        self.on_tracks = Some(Box::new(callback));
        self
    }

    pub fn on_transport(
        mut self,
        callback: impl Fn(TransportState) + Send + Sync + 'static,
    ) -> Self {
        self.on_transport = Some(Box::new(callback));
        self
    }
}

#[derive(Default)]
pub struct Poller {
    task: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start polling. Does nothing but warn if a poll loop is already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<B: Backend>(
        &mut self,
        channel: Arc<ControlChannel<B>>,
        callbacks: PollCallbacks,
        interval: Duration,
    ) {
        if self.is_polling() {
            warn!("poller already running");
            return;
        }

        info!(interval_ms = interval.as_millis() as u64, "starting poller");
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                if let Err(e) = poll_once(&channel, &callbacks).await {
                    warn!(error = %e, "poll failed");
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("poller stopped");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_once<B: Backend>(
    channel: &ControlChannel<B>,
    callbacks: &PollCallbacks,
) -> Result<(), ClientError> {
    if let Some(on_tracks) = &callbacks.on_tracks {
        on_tracks(channel.fetch_tracks().await?);
    }
    if let Some(on_transport) = &callbacks.on_transport {
        on_transport(channel.fetch_transport().await?);
    }
    Ok(())
}
