use eframe::egui;

use crate::ui::state::{LoginState, RegisterState};

#[derive(Default)]
pub struct AuthActions {
    pub submit: bool,
    pub switch_view: bool,
}

pub fn render_login(ui: &mut egui::Ui, login: &mut LoginState) -> AuthActions {
    let mut actions = AuthActions::default();

    ui.heading("Log in");
    ui.separator();

    egui::Grid::new("login_form").num_columns(2).show(ui, |ui| {
        ui.label("Email");
        ui.text_edit_singleline(&mut login.form.email);
        ui.end_row();

        ui.label("Password");
        ui.add(egui::TextEdit::singleline(&mut login.form.password).password(true));
        ui.end_row();
    });

    if ui.button("Log in").clicked() {
        actions.submit = true;
    }
    if let Some(error) = login.error {
        ui.colored_label(egui::Color32::RED, error);
    }

    ui.separator();
    if ui.link("No account yet? Register").clicked() {
        actions.switch_view = true;
    }

    actions
}

pub fn render_register(ui: &mut egui::Ui, register: &mut RegisterState) -> AuthActions {
    let mut actions = AuthActions::default();

    ui.heading("Register");
    ui.separator();

    egui::Grid::new("register_form").num_columns(2).show(ui, |ui| {
        ui.label("Full name");
        ui.text_edit_singleline(&mut register.form.full_name);
        ui.end_row();

        ui.label("Email");
        ui.text_edit_singleline(&mut register.form.email);
        ui.end_row();

        ui.label("Password");
        ui.add(egui::TextEdit::singleline(&mut register.form.password).password(true));
        ui.end_row();
    });

    if ui.button("Register").clicked() {
        actions.submit = true;
    }
    if let Some(message) = register.message {
        ui.label(message);
    }

    ui.separator();
    if ui.link("Already registered? Log in").clicked() {
        actions.switch_view = true;
    }

    actions
}
