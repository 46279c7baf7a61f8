use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{ApiCommand, ApiEvent};

use super::components::{
    auth_forms, chat_area, device_detail, device_form,
    device_list::{self, DeviceListActions},
    input_bar, profile,
    sidebar::{self, SidebarActions},
};
use super::state::{AppState, View};

/// Repaint at least this often so poll results and the register redirect
/// show up without user input.
const REPAINT_INTERVAL: Duration = Duration::from_millis(250);

pub struct MarketApp {
    state: AppState,
    command_sender: mpsc::Sender<ApiCommand>,
    event_receiver: mpsc::Receiver<ApiEvent>,
}

impl MarketApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        command_sender: mpsc::Sender<ApiCommand>,
        event_receiver: mpsc::Receiver<ApiEvent>,
        initial_view: View,
    ) -> Self {
        let mut app = Self {
            state: AppState::new(),
            command_sender,
            event_receiver,
        };
        let commands = app.state.navigate(initial_view);
        app.send_commands(commands);
        app
    }

    fn handle_api_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            let commands = self.state.apply_event(event);
            self.send_commands(commands);
        }
    }

    fn send_commands(&mut self, commands: Vec<ApiCommand>) {
        for command in commands {
            self.send_command(command);
        }
    }

    fn send_command(&mut self, command: ApiCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to API worker: {err}");
        }
    }

    fn navigate(&mut self, view: View) {
        let commands = self.state.navigate(view);
        self.send_commands(commands);
    }

    fn render_auth(&mut self, ui: &mut egui::Ui) {
        match self.state.view {
            View::Login => {
                let actions = auth_forms::render_login(ui, &mut self.state.login);
                if actions.submit {
                    if let Some(command) = self.state.login.submit() {
                        self.send_command(command);
                    }
                }
                if actions.switch_view {
                    self.navigate(View::Register);
                }
            }
            View::Register => {
                let actions = auth_forms::render_register(ui, &mut self.state.register);
                if actions.submit {
                    if let Some(command) = self.state.register.submit() {
                        self.send_command(command);
                    }
                }
                if actions.switch_view {
                    self.navigate(View::Login);
                }
            }
            _ => {}
        }
    }

    fn render_main(&mut self, ui: &mut egui::Ui) {
        match self.state.view {
            View::Devices => {
                let actions: DeviceListActions = device_list::render(ui, &mut self.state.devices);
                if actions.reload {
                    self.navigate(View::Devices);
                }
                if let Some(thread) = actions.open_chat {
                    let commands = self.state.open_chat(thread);
                    self.send_commands(commands);
                }
                if let Some(id) = actions.show_device {
                    let commands = self.state.show_device(id);
                    self.send_commands(commands);
                }
            }
            View::DeviceDetail => {
                if device_detail::render(ui, &self.state.device_detail) {
                    self.navigate(View::Devices);
                }
            }
            View::CreateDevice => {
                if device_form::render(ui, &mut self.state.device_form) {
                    if let Some(command) = self.state.device_form.submit() {
                        self.send_command(command);
                    }
                }
            }
            View::Profile => profile::render(ui, &self.state.profile),
            View::Chat => self.render_chat(ui),
            View::Login | View::Register => {}
        }
    }

    fn render_chat(&mut self, ui: &mut egui::Ui) {
        let Some(chat) = self.state.chat.as_mut() else {
            return;
        };

        chat_area::render(ui, chat);
        ui.separator();
        if input_bar::render(ui, &mut chat.input_text) {
            if let Some(command) = chat.submit() {
                self.send_command(command);
            }
        }
    }
}

impl eframe::App for MarketApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_api_events();
        let commands = self.state.tick(Instant::now());
        self.send_commands(commands);

        let signed_in = !matches!(self.state.view, View::Login | View::Register);

        if signed_in {
            egui::SidePanel::left("nav_sidebar")
                .resizable(true)
                .default_width(180.0)
                .show(ctx, |ui| {
                    let actions: SidebarActions = sidebar::render(ui, &self.state);
                    if let Some(view) = actions.navigate {
                        self.navigate(view);
                    }
                    if actions.logout {
                        self.send_command(ApiCommand::Logout);
                    }
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if signed_in {
                self.render_main(ui);
            } else {
                self.render_auth(ui);
            }
        });

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
