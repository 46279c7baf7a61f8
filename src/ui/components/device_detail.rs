use eframe::egui;

use crate::ui::state::DeviceDetailState;

/// Returns true when "Back" was clicked.
pub fn render(ui: &mut egui::Ui, state: &DeviceDetailState) -> bool {
    let back = ui.button("← Back").clicked();
    ui.separator();

    if let Some(error) = state.error {
        ui.colored_label(egui::Color32::RED, error);
        return back;
    }

    let Some(device) = &state.device else {
        ui.spinner();
        return back;
    };

    ui.heading(&device.title);
    egui::Grid::new("device_detail").num_columns(2).show(ui, |ui| {
        ui.label("City");
        ui.label(&device.city);
        ui.end_row();

        ui.label("Price per day");
        ui.label(&device.price_per_day);
        ui.end_row();

        ui.label("Available");
        ui.label(format!("{} to {}", device.available_from, device.available_to));
        ui.end_row();

        if let Some(owner) = device.owner {
            ui.label("Owner");
            ui.label(format!("#{owner}"));
            ui.end_row();
        }
    });

    ui.separator();
    ui.label(&device.description);
    if !device.rules.is_empty() {
        ui.label(format!("Rules: {}", device.rules));
    }

    back
}
