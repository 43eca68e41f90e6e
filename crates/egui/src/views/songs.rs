use eframe::egui;
use remote_core::SessionSnapshot;
use remote_protocol::truncate;

use super::UiAction;

const SONG_NAME_CHARS: usize = 20;

pub fn songs_panel(ui: &mut egui::Ui, snapshot: &SessionSnapshot, actions: &mut Vec<UiAction>) {
    ui.heading("Songs");
    ui.separator();

    if snapshot.songs.is_empty() {
        ui.label("No songs found");
        ui.weak("Add regions to the project to list songs here.");
        return;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for song in &snapshot.songs {
            let selected = snapshot.current_song == Some(song.id);

            let response = ui
                .horizontal(|ui| {
                    if snapshot.playing_song == Some(song.id) {
                        ui.label(egui::RichText::new("▶").monospace());
                    } else {
                        ui.label(egui::RichText::new(song.number.to_string()).weak().monospace());
                    }
                    let label = ui.selectable_label(
                        selected,
                        egui::RichText::new(truncate(&song.name, SONG_NAME_CHARS)).size(16.0),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(egui::RichText::new(&song.time).monospace());
                    });
                    label
                })
                .inner;

            if response.on_hover_text(&song.name).clicked() {
                actions.push(UiAction::SelectSong(song.id));
            }
        }
    });
}
