use eframe::egui;
use remote_core::{Highlight, SessionSnapshot};

use super::UiAction;

const PENDING_FILL: egui::Color32 = egui::Color32::from_rgb(214, 128, 30);
const ACTIVE_FILL: egui::Color32 = egui::Color32::from_rgb(52, 160, 88);
const BUTTON_SIZE: egui::Vec2 = egui::vec2(150.0, 64.0);

pub fn sections_panel(ui: &mut egui::Ui, snapshot: &SessionSnapshot, actions: &mut Vec<UiAction>) {
    let Some(song) = snapshot
        .current_song
        .and_then(|id| snapshot.songs.iter().find(|song| song.id == id))
    else {
        ui.label("Select a song");
        return;
    };

    ui.heading(&song.name);

    if snapshot.sections.is_empty() {
        ui.label("No sections found");
        ui.weak("Add markers inside the song's region to jump between sections.");
        return;
    }

    ui.horizontal_wrapped(|ui| {
        for section in &snapshot.sections {
            let mut button =
                egui::Button::new(egui::RichText::new(&section.name).size(18.0)).min_size(BUTTON_SIZE);
            match section.highlight {
                Highlight::Pending => button = button.fill(PENDING_FILL),
                Highlight::Active => button = button.fill(ACTIVE_FILL),
                Highlight::Idle => {}
            }

            if ui.add(button).clicked() {
                actions.push(UiAction::ClickSection(section.id));
            }
        }
    });
}
