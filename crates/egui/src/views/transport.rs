use eframe::egui;
use remote_core::SessionSnapshot;

use super::UiAction;

pub fn transport_bar(ui: &mut egui::Ui, snapshot: &SessionSnapshot, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        let playing = snapshot.transport.is_playing;

        if ui.add(egui::Button::new("▶ Play").selected(playing)).clicked() {
            actions.push(UiAction::Play);
        }
        if ui.button("⏹ Stop").clicked() {
            actions.push(UiAction::Stop);
        }
        if ui
            .add_enabled(snapshot.current_song.is_some(), egui::Button::new("⏮ Song start"))
            .clicked()
        {
            actions.push(UiAction::GoToSongStart);
        }

        ui.add_space(12.0);
        ui.label(egui::RichText::new(&snapshot.transport.time).monospace().size(20.0));
    });
}
