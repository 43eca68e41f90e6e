use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

use eframe::egui;
use remote_core::{
    Config, Poller, Session, SessionSnapshot, connect, session_to_snapshot,
};
use remote_protocol::{JumpMode, TrackId};
use tracing::{error, info};

use crate::commands::{self, Channel};
use crate::events::{AppEvent, EventSink};
use crate::views::{
    SettingsForm, SettingsOutcome, StripState, UiAction, jump_controls, mixer_panel,
    sections_panel, songs_panel, transport_bar,
};

pub struct RemoteApp {
    config: Config,
    session: Session,
    channel: Option<Channel>,
    poller: Poller,
    sink: EventSink,
    events: Receiver<AppEvent>,
    strips: BTreeMap<TrackId, StripState>,
    alert: Option<String>,
    settings: Option<SettingsForm>,
}

impl RemoteApp {
    pub fn new(ctx: egui::Context, config: Config) -> Self {
        let (sink, events) = EventSink::new(ctx);
        let session = Session::new(config.navigation.jump_mode, config.navigation.bar_count);

        let mut app = Self {
            config,
            session,
            channel: None,
            poller: Poller::new(),
            sink,
            events,
            strips: BTreeMap::new(),
            alert: None,
            settings: None,
        };
        app.connect();
        app
    }

    fn connect(&mut self) {
        self.poller.stop();
        self.strips.clear();

        let channel = match connect(&self.config) {
            Ok(channel) => Arc::new(channel),
            Err(e) => {
                error!(error = %e, "could not set up connection");
                self.channel = None;
                self.alert = Some(format!("Could not connect: {e}"));
                self.settings = Some(SettingsForm::from_config(&self.config));
                return;
            }
        };

        commands::load_setlist(&channel, &self.sink);
        commands::start_poller(
            &mut self.poller,
            &channel,
            &self.sink,
            self.config.poll_interval(),
        );
        commands::log_smooth_seeking_status(
            &channel,
            self.session.jump_mode(),
            self.session.bar_count(),
        );
        self.channel = Some(channel);
    }

    fn save_config(&mut self) {
        self.config.navigation.jump_mode = self.session.jump_mode();
        self.config.navigation.bar_count = self.session.bar_count();
        if let Err(e) = self.config.save() {
            error!(error = %e, "saving config failed");
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Markers(markers) => self.session.set_markers(markers),
            AppEvent::Regions(regions) => {
                self.session.set_regions(regions);
                if self.session.current_song().is_none() {
                    if let Some(first) = self.session.songs().first() {
                        self.session.select_song(first.id);
                    }
                }
            }
            AppEvent::Tracks(tracks) => {
                self.session.set_tracks(tracks);
                self.sync_strips();
            }
            AppEvent::Transport(transport) => {
                if let Some(section) = self.session.observe_transport(transport) {
                    info!(%section, "reached pending section");
                }
            }
            AppEvent::MuteApplied { id, muted } => self.session.set_track_mute(id, muted),
            AppEvent::JumpFailed { section, message } => {
                self.session.jump_failed(section);
                self.alert = Some(message);
            }
            AppEvent::CancelFinished(true) => {
                self.session.cancel_pending();
                // The script falls back to immediate jumps after a cancel.
                self.session.set_jump_mode(JumpMode::Immediate);
                self.save_config();
            }
            AppEvent::CancelFinished(false) => {
                self.alert = Some("Could not cancel the scheduled jump".to_string());
            }
            AppEvent::Alert(message) => self.alert = Some(message),
        }
    }

    fn sync_strips(&mut self) {
        let Some(channel) = &self.channel else {
            return;
        };

        let snapshot = session_to_snapshot(&self.session);
        self.strips
            .retain(|id, _| snapshot.faders.iter().any(|fader| fader.id == *id));

        for fader in &snapshot.faders {
            self.strips
                .entry(fader.id)
                .and_modify(|strip| strip.reconcile(fader))
                .or_insert_with(|| StripState::new(fader, channel));
        }
    }

    fn apply(&mut self, action: UiAction) {
        if action == UiAction::OpenSettings {
            self.settings = Some(SettingsForm::from_config(&self.config));
            return;
        }

        let Some(channel) = self.channel.clone() else {
            self.alert = Some("Not connected to the DAW".to_string());
            return;
        };

        match action {
            UiAction::SelectSong(id) => {
                self.session.select_song(id);
            }
            UiAction::ClickSection(id) => {
                if let Some(plan) = self.session.click_section(id) {
                    commands::jump(&channel, &self.sink, plan, self.session.jump_mode());
                }
            }
            UiAction::Play => commands::play(&channel, &self.sink),
            UiAction::Stop => commands::stop(&channel, &self.sink),
            UiAction::GoToSongStart => {
                if let Some(song) = self.session.current_song() {
                    commands::seek(&channel, &self.sink, song.start);
                }
            }
            UiAction::SetJumpMode(mode) => {
                self.session.set_jump_mode(mode);
                self.save_config();
                commands::configure_jump_mode(&channel, &self.sink, mode, self.session.bar_count());
            }
            UiAction::SetBarCount(count) => {
                self.session.set_bar_count(count);
                self.save_config();
                if self.session.jump_mode() == JumpMode::Bar {
                    commands::configure_jump_mode(&channel, &self.sink, JumpMode::Bar, count);
                }
            }
            UiAction::CancelPendingJump => commands::cancel_scheduled_jump(&channel, &self.sink),
            UiAction::ToggleMute(id) => {
                if let Some(track) = self.session.track(id) {
                    commands::set_mute(&channel, &self.sink, id, !track.mute);
                }
            }
            UiAction::OpenSettings => {}
        }
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.alert else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Message")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.alert = None;
        }
    }

    fn show_settings(&mut self, ctx: &egui::Context) {
        let Some(form) = &mut self.settings else {
            return;
        };

        match form.show(ctx) {
            SettingsOutcome::Open => {}
            SettingsOutcome::Cancel => self.settings = None,
            SettingsOutcome::Save => {
                form.apply_to(&mut self.config);
                self.settings = None;
                self.save_config();
                self.connect();
            }
        }
    }

    fn header(&self, ui: &mut egui::Ui, snapshot: &SessionSnapshot, actions: &mut Vec<UiAction>) {
        ui.horizontal(|ui| {
            ui.heading("DAW Remote");
            ui.add_space(16.0);
            transport_bar(ui, snapshot, actions);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("⚙").on_hover_text("Connection settings").clicked() {
                    actions.push(UiAction::OpenSettings);
                }
                let status = match &self.channel {
                    Some(channel) if channel.backend().is_mock() => "mock session",
                    Some(_) => self.config.endpoint.base_url.as_str(),
                    None => "disconnected",
                };
                ui.weak(status);
            });
        });
    }
}

impl eframe::App for RemoteApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
        }

        let snapshot = session_to_snapshot(&self.session);
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.header(ui, &snapshot, &mut actions);
        });

        egui::TopBottomPanel::bottom("mixer")
            .resizable(true)
            .min_height(220.0)
            .show(ctx, |ui| {
                mixer_panel(ui, &snapshot.faders, &mut self.strips, &mut actions);
            });

        egui::SidePanel::left("songs")
            .default_width(260.0)
            .show(ctx, |ui| {
                songs_panel(ui, &snapshot, &mut actions);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            jump_controls(ui, &snapshot, &mut actions);
            ui.separator();
            sections_panel(ui, &snapshot, &mut actions);
        });

        self.show_settings(ctx);
        self.show_alert(ctx);

        if self.alert.is_none() && self.settings.is_none() {
            for action in actions {
                self.apply(action);
            }
        }
    }
}
