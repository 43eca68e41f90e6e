//! Background operations started by the UI.
//!
//! Each function spawns one task on the tokio runtime, talks to the DAW
//! through the shared control channel, and reports back through the
//! [`EventSink`]. None of them touch the session directly.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use remote_core::{
    ControlChannel, JumpMode, JumpOutcome, JumpPlan, PollCallbacks, Poller, Throttle,
    ThrottledSender,
};
use remote_protocol::TrackId;
use tracing::{info, warn};

use crate::events::{AppEvent, EventSink};

pub type Channel = Arc<ControlChannel>;

pub type SendFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
pub type MixerSender = ThrottledSender<f64, Box<dyn Fn(f64) -> SendFuture + Send + Sync>>;

/// Fetch markers and regions, retrying once before telling the user.
pub fn load_setlist(channel: &Channel, sink: &EventSink) {
    let channel = Arc::clone(channel);
    let sink = sink.clone();

    tokio::spawn(async move {
        for attempt in 1..=2 {
            let result = async {
                let markers = channel.fetch_markers().await?;
                let regions = channel.fetch_regions().await?;
                Ok::<_, remote_core::ClientError>((markers, regions))
            }
            .await;

            match result {
                Ok((markers, regions)) => {
                    sink.send(AppEvent::Markers(markers));
                    sink.send(AppEvent::Regions(regions));
                    return;
                }
                Err(e) if attempt == 1 => warn!(error = %e, "loading setlist failed, retrying"),
                Err(e) => sink.alert(format!("Could not load songs from the DAW: {e}")),
            }
        }
    });
}

pub fn start_poller(poller: &mut Poller, channel: &Channel, sink: &EventSink, interval: std::time::Duration) {
    let tracks_sink = sink.clone();
    let transport_sink = sink.clone();

    poller.start(
        Arc::clone(channel),
        PollCallbacks::default()
            .on_tracks(move |tracks| tracks_sink.send(AppEvent::Tracks(tracks)))
            .on_transport(move |transport| transport_sink.send(AppEvent::Transport(transport))),
        interval,
    );
}

pub fn play(channel: &Channel, sink: &EventSink) {
    let channel = Arc::clone(channel);
    let sink = sink.clone();
    tokio::spawn(async move {
        if let Err(e) = channel.play().await {
            sink.alert(format!("Play failed: {e}"));
        }
    });
}

pub fn stop(channel: &Channel, sink: &EventSink) {
    let channel = Arc::clone(channel);
    let sink = sink.clone();
    tokio::spawn(async move {
        if let Err(e) = channel.stop().await {
            sink.alert(format!("Stop failed: {e}"));
        }
    });
}

pub fn seek(channel: &Channel, sink: &EventSink, seconds: f64) {
    let channel = Arc::clone(channel);
    let sink = sink.clone();
    tokio::spawn(async move {
        if let Err(e) = channel.seek_to(seconds).await {
            sink.alert(format!("Seek failed: {e}"));
        }
    });
}

pub fn jump(channel: &Channel, sink: &EventSink, plan: JumpPlan, mode: JumpMode) {
    let channel = Arc::clone(channel);
    let sink = sink.clone();
    tokio::spawn(async move {
        match channel.jump_to(plan.target, mode).await {
            Ok(JumpOutcome::FellBack) => {
                info!(section = %plan.section, "deferred jump fell back to an immediate seek");
            }
            Ok(_) => {}
            Err(e) => sink.send(AppEvent::JumpFailed {
                section: plan.section,
                message: format!("Jump failed: {e}"),
            }),
        }
    });
}

/// Push a jump mode change to the companion script.
pub fn configure_jump_mode(channel: &Channel, sink: &EventSink, mode: JumpMode, bar_count: u32) {
    let channel = Arc::clone(channel);
    let sink = sink.clone();
    tokio::spawn(async move {
        if let Err(e) = channel.configure_jump_mode(mode, bar_count).await {
            sink.alert(format!("Could not switch to '{mode}' jumps: {e}"));
        }
    });
}

pub fn cancel_scheduled_jump(channel: &Channel, sink: &EventSink) {
    let channel = Arc::clone(channel);
    let sink = sink.clone();
    tokio::spawn(async move {
        let cancelled = channel.cancel_scheduled_jump().await;
        sink.send(AppEvent::CancelFinished(cancelled));
    });
}

/// Ask the companion script for its status and log what it is assumed to do.
pub fn log_smooth_seeking_status(channel: &Channel, mode: JumpMode, bar_count: u32) {
    let channel = Arc::clone(channel);
    tokio::spawn(async move {
        let status = channel.smooth_seeking_status(mode, bar_count).await;
        info!(
            enabled = status.enabled,
            mode = status.mode.as_str(),
            measures = status.measures,
            "smooth seeking status"
        );
    });
}

pub fn set_mute(channel: &Channel, sink: &EventSink, id: TrackId, muted: bool) {
    let channel = Arc::clone(channel);
    let sink = sink.clone();
    tokio::spawn(async move {
        match channel.set_track_mute(id, muted).await {
            Ok(()) => sink.send(AppEvent::MuteApplied { id, muted }),
            Err(e) => sink.alert(format!("Mute failed: {e}")),
        }
    });
}

pub fn volume_sender(channel: &Channel, id: TrackId) -> MixerSender {
    let channel = Arc::clone(channel);
    let send: Box<dyn Fn(f64) -> SendFuture + Send + Sync> =
        Box::new(move |fader: f64| -> SendFuture {
            let channel = Arc::clone(&channel);
            Box::pin(async move {
                if let Err(e) = channel.set_track_volume(id, fader).await {
                    warn!(%id, error = %e, "setting volume failed");
                }
            })
        });
    ThrottledSender::new(Throttle::default(), send)
}

pub fn pan_sender(channel: &Channel, id: TrackId) -> MixerSender {
    let channel = Arc::clone(channel);
    let send: Box<dyn Fn(f64) -> SendFuture + Send + Sync> =
        Box::new(move |pan: f64| -> SendFuture {
            let channel = Arc::clone(&channel);
            Box::pin(async move {
                if let Err(e) = channel.set_track_pan(id, pan).await {
                    warn!(%id, error = %e, "setting pan failed");
                }
            })
        });
    ThrottledSender::new(Throttle::default(), send)
}
