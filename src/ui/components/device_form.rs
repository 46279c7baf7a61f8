use eframe::egui;

use crate::ui::state::DeviceFormState;

/// Returns true when "Create" was clicked.
pub fn render(ui: &mut egui::Ui, state: &mut DeviceFormState) -> bool {
    ui.heading("Create device");
    ui.separator();

    let form = &mut state.form;
    egui::Grid::new("device_form").num_columns(2).show(ui, |ui| {
        ui.label("Title");
        ui.text_edit_singleline(&mut form.title);
        ui.end_row();

        ui.label("Description");
        ui.text_edit_multiline(&mut form.description);
        ui.end_row();

        ui.label("City");
        ui.text_edit_singleline(&mut form.city);
        ui.end_row();

        ui.label("Price per day");
        ui.text_edit_singleline(&mut form.price_per_day);
        ui.end_row();

        ui.label("Available from (YYYY-MM-DD)");
        ui.text_edit_singleline(&mut form.available_from);
        ui.end_row();

        ui.label("Available to (YYYY-MM-DD)");
        ui.text_edit_singleline(&mut form.available_to);
        ui.end_row();

        ui.label("Rules");
        ui.text_edit_multiline(&mut form.rules);
        ui.end_row();

        ui.label("Image file");
        ui.text_edit_singleline(&mut state.image_path);
        ui.end_row();
    });

    let clicked = ui
        .add_enabled(!state.submitting, egui::Button::new("Create"))
        .clicked();

    if let Some(error) = &state.error {
        ui.colored_label(egui::Color32::RED, error);
    }

    clicked
}
