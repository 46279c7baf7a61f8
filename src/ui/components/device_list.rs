use eframe::egui;

use crate::common::ThreadId;
use crate::ui::state::DevicesState;

#[derive(Default)]
pub struct DeviceListActions {
    pub reload: bool,
    pub open_chat: Option<ThreadId>,
    pub show_device: Option<i64>,
}

pub fn render(ui: &mut egui::Ui, state: &mut DevicesState) -> DeviceListActions {
    let mut actions = DeviceListActions::default();

    ui.horizontal(|ui| {
        ui.heading("Devices");
        if state.loading {
            ui.spinner();
        } else if ui.button("Reload").clicked() {
            actions.reload = true;
        }
    });
    ui.separator();

    // Mở chat theo mã yêu cầu thuê
    ui.horizontal(|ui| {
        ui.label("Rental request #");
        ui.text_edit_singleline(&mut state.chat_request_input);
        if ui.button("Open chat").clicked() {
            actions.open_chat = state.take_chat_request();
        }
    });
    if let Some(error) = &state.chat_request_error {
        ui.colored_label(egui::Color32::RED, error);
    }
    ui.separator();

    if let Some(error) = state.error {
        ui.colored_label(egui::Color32::RED, error);
    }

    if state.devices.is_empty() && !state.loading {
        ui.label("No devices listed yet");
        return actions;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for device in &state.devices {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.strong(&device.title);
                    ui.label(egui::RichText::new(&device.city).weak());
                    ui.label(format!("{} / day", device.price_per_day));
                    if ui.small_button("Details").clicked() {
                        actions.show_device = Some(device.id);
                    }
                });
                ui.label(&device.description);
                ui.label(
                    egui::RichText::new(format!(
                        "Available {} to {}",
                        device.available_from, device.available_to
                    ))
                    .weak(),
                );
                if !device.rules.is_empty() {
                    ui.label(format!("Rules: {}", device.rules));
                }
            });
        }
    });

    actions
}
