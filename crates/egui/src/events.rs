use std::sync::mpsc::{Receiver, Sender, channel};

use eframe::egui;
use remote_protocol::{Marker, MarkerId, Region, Track, TrackId, TransportState};

/// Results of background work, applied to the session on the UI thread.
#[derive(Debug)]
pub enum AppEvent {
    Markers(Vec<Marker>),
    Regions(Vec<Region>),
    Tracks(Vec<Track>),
    Transport(TransportState),
    /// The DAW accepted a mute change.
    MuteApplied { id: TrackId, muted: bool },
    JumpFailed { section: MarkerId, message: String },
    CancelFinished(bool),
    /// Shown to the user in a blocking message window.
    Alert(String),
}

/// Sending half handed to background tasks. Every event wakes the UI.
#[derive(Clone)]
pub struct EventSink {
    tx: Sender<AppEvent>,
    ctx: egui::Context,
}

impl EventSink {
    pub fn new(ctx: egui::Context) -> (Self, Receiver<AppEvent>) {
        let (tx, rx) = channel();
        (Self { tx, ctx }, rx)
    }

    pub fn send(&self, event: AppEvent) {
        // The receiver only goes away when the app is shutting down.
        if self.tx.send(event).is_ok() {
            self.ctx.request_repaint();
        }
    }

    pub fn alert(&self, message: impl Into<String>) {
        self.send(AppEvent::Alert(message.into()));
    }
}
