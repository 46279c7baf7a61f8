use crate::ui::state::{AppState, View};
use eframe::egui;

#[derive(Default)]
pub struct SidebarActions {
    pub navigate: Option<View>,
    pub logout: bool,
}

const LINKS: [(View, &str); 3] = [
    (View::Devices, "Devices"),
    (View::CreateDevice, "Create device"),
    (View::Profile, "Profile"),
];

pub fn render(ui: &mut egui::Ui, state: &AppState) -> SidebarActions {
    let mut actions = SidebarActions::default();

    ui.heading("GameGear");
    ui.separator();

    for (view, label) in LINKS {
        if ui.selectable_label(state.view == view, label).clicked() {
            actions.navigate = Some(view);
        }
    }

    // Đang mở chat thì hiển thị thread hiện tại
    if let Some(chat) = &state.chat {
        ui.separator();
        ui.colored_label(egui::Color32::GREEN, "●");
        ui.label(format!("Chat #{}", chat.thread));
    }

    ui.separator();
    if ui.button("Log out").clicked() {
        actions.logout = true;
    }

    actions
}
