use std::collections::BTreeMap;

use eframe::egui;
use remote_core::{FaderView, reconcile_echo, snap_pan, snap_volume};
use remote_protocol::{TrackId, format_db, format_pan};

use super::UiAction;
use crate::commands::{Channel, MixerSender, pan_sender, volume_sender};

const MUTED_FILL: egui::Color32 = egui::Color32::from_rgb(190, 60, 50);
const STRIP_WIDTH: f32 = 76.0;

/// Displayed slider values of one track, owned by the UI.
pub struct StripState {
    volume: f64,
    pan: f64,
    volume_dragging: bool,
    pan_dragging: bool,
    volume_sender: MixerSender,
    pan_sender: MixerSender,
}

impl StripState {
    pub fn new(fader: &FaderView, channel: &Channel) -> Self {
        Self {
            volume: fader.vol,
            pan: fader.pan,
            volume_dragging: false,
            pan_dragging: false,
            volume_sender: volume_sender(channel, fader.id),
            pan_sender: pan_sender(channel, fader.id),
        }
    }

    /// Adopt values polled from the DAW unless the user is holding the slider.
    pub fn reconcile(&mut self, fader: &FaderView) {
        self.volume = reconcile_echo(self.volume, fader.vol, self.volume_dragging);
        self.pan = reconcile_echo(self.pan, fader.pan, self.pan_dragging);
    }
}

pub fn mixer_panel(
    ui: &mut egui::Ui,
    faders: &[FaderView],
    strips: &mut BTreeMap<TrackId, StripState>,
    actions: &mut Vec<UiAction>,
) {
    if faders.is_empty() {
        ui.weak("No tracks");
        return;
    }

    egui::ScrollArea::horizontal().show(ui, |ui| {
        ui.horizontal(|ui| {
            for fader in faders {
                let Some(strip) = strips.get_mut(&fader.id) else {
                    continue;
                };
                ui.vertical(|ui| {
                    ui.set_width(STRIP_WIDTH);
                    strip_ui(ui, fader, strip, actions);
                });
                ui.separator();
            }
        });
    });
}

fn strip_ui(ui: &mut egui::Ui, fader: &FaderView, strip: &mut StripState, actions: &mut Vec<UiAction>) {
    let mut mute = egui::Button::new("M").selected(fader.mute);
    if fader.mute {
        mute = mute.fill(MUTED_FILL);
    }
    if ui.add(mute).clicked() {
        actions.push(UiAction::ToggleMute(fader.id));
    }

    ui.label(&fader.short_name).on_hover_text(&fader.name);

    let volume = ui.add(
        egui::Slider::new(&mut strip.volume, 0.0..=1.0)
            .vertical()
            .show_value(false),
    );
    strip.volume_dragging = volume.dragged();
    if volume.changed() {
        strip.volume = snap_volume(strip.volume);
        strip.volume_sender.push(strip.volume);
    }
    if volume.drag_stopped() {
        strip.volume_sender.release(strip.volume);
    }
    ui.label(egui::RichText::new(format_db(strip.volume)).monospace().small());

    let pan = ui.add(egui::Slider::new(&mut strip.pan, -1.0..=1.0).show_value(false));
    strip.pan_dragging = pan.dragged();
    if pan.changed() {
        strip.pan = snap_pan(strip.pan);
        strip.pan_sender.push(strip.pan);
    }
    if pan.drag_stopped() {
        strip.pan_sender.release(strip.pan);
    }
    ui.label(egui::RichText::new(format_pan(strip.pan)).monospace().small());
}
