use eframe::egui;

use crate::common::ChatMessage;
use crate::ui::chat::{ChatState, PollPhase};

pub fn render(ui: &mut egui::Ui, chat: &ChatState) {
    ui.horizontal(|ui| {
        ui.heading(format!("Chat #{}", chat.thread));
        if chat.phase == PollPhase::Fetching {
            ui.spinner();
        }
    });
    ui.separator();

    let height = (ui.available_height() - 40.0).max(100.0);
    egui::ScrollArea::vertical()
        .max_height(height)
        .stick_to_bottom(true)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if chat.messages.is_empty() && chat.phase != PollPhase::Fetching {
                ui.label(egui::RichText::new("No messages yet").weak());
            }
            for message in &chat.messages {
                bubble(ui, message);
            }
        });
}

fn bubble(ui: &mut egui::Ui, message: &ChatMessage) {
    // Tin của mình căn phải, của người kia căn trái
    let layout = if message.is_sender {
        egui::Layout::right_to_left(egui::Align::TOP)
    } else {
        egui::Layout::left_to_right(egui::Align::TOP)
    };

    ui.with_layout(layout, |ui| {
        let fill = if message.is_sender {
            ui.visuals().selection.bg_fill
        } else {
            ui.visuals().faint_bg_color
        };
        egui::Frame::new()
            .fill(fill)
            .corner_radius(6.0)
            .inner_margin(egui::Margin::symmetric(8, 4))
            .show(ui, |ui| {
                ui.label(message.display_line());
            });
    });
}
