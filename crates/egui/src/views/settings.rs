use eframe::egui;
use remote_core::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOutcome {
    Open,
    Save,
    Cancel,
}

/// Editable copy of the connection settings.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    base_url: String,
    username: String,
    password: String,
    script_command_id: String,
    mock: bool,
}

impl SettingsForm {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.endpoint.base_url.clone(),
            username: config.endpoint.username.clone(),
            password: config.endpoint.password.clone(),
            script_command_id: config
                .navigation
                .script_command_id
                .clone()
                .unwrap_or_default(),
            mock: config.endpoint.mock,
        }
    }

    pub fn apply_to(&self, config: &mut Config) {
        config.endpoint.base_url = self.base_url.trim().to_string();
        config.endpoint.username = self.username.trim().to_string();
        config.endpoint.password = self.password.clone();
        config.endpoint.mock = self.mock;

        let script = self.script_command_id.trim();
        config.navigation.script_command_id = (!script.is_empty()).then(|| script.to_string());
    }

    pub fn show(&mut self, ctx: &egui::Context) -> SettingsOutcome {
        let mut outcome = SettingsOutcome::Open;

        egui::Window::new("Connection")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("DAW address");
                        ui.text_edit_singleline(&mut self.base_url);
                        ui.end_row();

                        ui.label("Username");
                        ui.text_edit_singleline(&mut self.username);
                        ui.end_row();

                        ui.label("Password");
                        ui.add(egui::TextEdit::singleline(&mut self.password).password(true));
                        ui.end_row();

                        ui.label("Script command id");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.script_command_id)
                                .hint_text("_RS7D3C92BC953A9A4AAC"),
                        );
                        ui.end_row();

                        ui.label("Offline demo");
                        ui.checkbox(&mut self.mock, "Use built-in mock session");
                        ui.end_row();
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        outcome = SettingsOutcome::Save;
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = SettingsOutcome::Cancel;
                    }
                });
            });

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_config() {
        let mut config = Config::default();
        config.navigation.script_command_id = Some("_RS1".to_string());

        let mut form = SettingsForm::from_config(&config);
        form.base_url = "  http://10.0.0.5:8080 ".to_string();
        form.mock = true;
        form.apply_to(&mut config);

        assert_eq!(config.endpoint.base_url, "http://10.0.0.5:8080");
        assert!(config.endpoint.mock);
        assert_eq!(config.navigation.script_command_id.as_deref(), Some("_RS1"));
    }

    #[test]
    fn test_blank_script_id_clears_it() {
        let mut config = Config::default();
        config.navigation.script_command_id = Some("_RS1".to_string());

        let mut form = SettingsForm::from_config(&config);
        form.script_command_id = "   ".to_string();
        form.apply_to(&mut config);

        assert_eq!(config.navigation.script_command_id, None);
    }
}
