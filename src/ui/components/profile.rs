use eframe::egui;

use crate::ui::state::ProfileState;

pub fn render(ui: &mut egui::Ui, state: &ProfileState) {
    ui.heading("Profile");
    ui.separator();

    if let Some(error) = state.error {
        ui.colored_label(egui::Color32::RED, error);
        return;
    }

    match &state.profile {
        Some(profile) => {
            egui::Grid::new("profile").num_columns(2).show(ui, |ui| {
                ui.label("Name");
                ui.label(&profile.full_name);
                ui.end_row();

                ui.label("Email");
                ui.label(&profile.email);
                ui.end_row();
            });
        }
        None => {
            ui.spinner();
        }
    }
}
