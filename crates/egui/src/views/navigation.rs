use eframe::egui;
use remote_core::{BAR_COUNT_OPTIONS, JumpMode, SessionSnapshot};

use super::UiAction;

fn mode_label(mode: JumpMode) -> &'static str {
    match mode {
        JumpMode::Immediate => "Immediate",
        JumpMode::Bar => "At bar",
        JumpMode::RegionEnd => "At song end",
    }
}

fn bars_label(count: u32) -> String {
    if count == 1 {
        "1 bar".to_string()
    } else {
        format!("{count} bars")
    }
}

pub fn jump_controls(ui: &mut egui::Ui, snapshot: &SessionSnapshot, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        ui.label("Jump:");
        for mode in JumpMode::ALL {
            let selected = snapshot.jump_mode == mode;
            if ui.selectable_label(selected, mode_label(mode)).clicked() && !selected {
                actions.push(UiAction::SetJumpMode(mode));
            }
        }

        ui.separator();

        ui.label("Wait:");
        egui::ComboBox::from_id_salt("bar_count")
            .selected_text(bars_label(snapshot.bar_count))
            .show_ui(ui, |ui| {
                for count in BAR_COUNT_OPTIONS {
                    let selected = snapshot.bar_count == count;
                    if ui.selectable_label(selected, bars_label(count)).clicked() && !selected {
                        actions.push(UiAction::SetBarCount(count));
                    }
                }
            });

        ui.separator();

        let can_cancel = snapshot.has_pending_jump || snapshot.jump_mode.is_deferred();
        if ui
            .add_enabled(can_cancel, egui::Button::new("✖ Cancel jump"))
            .clicked()
        {
            actions.push(UiAction::CancelPendingJump);
        }
    });
}
