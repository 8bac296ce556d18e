// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Login form with live validation and the rejected-credentials dialog.

use std::time::Instant;

use eframe::egui;

use crate::logic::modal::Panel;
use crate::logic::validator::FormValidator;
use crate::models::field::{FieldDescriptor, FieldId};
use crate::ui::components::field_label::{field_label, form_error};
use crate::ui::components::modal::{self, ModalMsg, PanelChrome};
use crate::ui::components::surface::{FormAnnotations, ModalView};

pub const EMAIL: &str = "email";
pub const PASSWORD: &str = "password";

/// Body of the dialog shown when the API rejects the credentials.
pub const REJECTED_MESSAGE: &str = "Utilisateur ou mot de passe incorrect";

/// MVU state for the login form.
pub struct LoginModel {
    form: FormValidator,
    annotations: FormAnnotations,
    submitting: bool,
}

impl Default for LoginModel {
    fn default() -> Self {
        let mut annotations = FormAnnotations::default();
        let form = FormValidator::attach(
            vec![FieldDescriptor::email(EMAIL), FieldDescriptor::text(PASSWORD)],
            &mut annotations,
        );
        Self {
            form,
            annotations,
            submitting: false,
        }
    }
}

impl LoginModel {
    pub fn email(&self) -> &str {
        self.form.text(&FieldId::from(EMAIL))
    }

    pub fn password(&self) -> &str {
        self.form.text(&FieldId::from(PASSWORD))
    }

    pub fn annotations(&self) -> &FormAnnotations {
        &self.annotations
    }

    pub fn submitting(&self) -> bool {
        self.submitting
    }

    /// Earliest pending debounced check.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.form.next_deadline()
    }

    /// A login request came back; `error` is shown above the submit button.
    pub fn finish(&mut self, error: Option<&str>) {
        self.submitting = false;
        match error {
            Some(message) => self.annotations.set_form_error(message),
            None => self.annotations.clear_form_error(),
        }
    }
}

/// Messages emitted by the login view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginMsg {
    EmailInput { value: String, at: Instant },
    /// Email field lost focus; validate without waiting for the debounce.
    EmailCommitted,
    PasswordInput(String),
    Submit,
    Tick(Instant),
}

/// Side effects requested by the login form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginCommand {
    Submit { email: String, password: String },
}

/// Update login state and enqueue the request on a valid submit.
pub fn update(model: &mut LoginModel, msg: LoginMsg, cmds: &mut Vec<LoginCommand>) {
    match msg {
        LoginMsg::EmailInput { value, at } => {
            model
                .form
                .on_input(&FieldId::from(EMAIL), value, at, &mut model.annotations);
        }
        LoginMsg::EmailCommitted => {
            let id = FieldId::from(EMAIL);
            if model.form.has_pending() {
                let value = model.form.text(&id).to_string();
                model.form.on_change(&id, value, &mut model.annotations);
            }
        }
        LoginMsg::PasswordInput(value) => {
            model.form.on_input(
                &FieldId::from(PASSWORD),
                value,
                Instant::now(),
                &mut model.annotations,
            );
        }
        LoginMsg::Tick(now) => {
            model.form.poll(now, &mut model.annotations);
        }
        LoginMsg::Submit => {
            if model.submitting || !model.form.is_valid() {
                log::debug!("Login submit ignored while form is invalid or busy");
                return;
            }
            model.submitting = true;
            model.annotations.clear_form_error();
            cmds.push(LoginCommand::Submit {
                email: model.email().trim().to_string(),
                password: model.password().to_string(),
            });
        }
    }
}

/// Render the login form.
pub fn view(ui: &mut egui::Ui, model: &LoginModel, scroll_locked: bool) -> Vec<LoginMsg> {
    let mut msgs = Vec::new();
    let email_id = FieldId::from(EMAIL);
    let password_id = FieldId::from(PASSWORD);

    egui::ScrollArea::vertical()
        .vscroll(!scroll_locked)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.set_max_width(380.0);
                ui.add_space(48.0);
                ui.heading("Log In");
                ui.add_space(24.0);

                field_label(ui, "E-mail", model.annotations().message(&email_id));
                let mut email = model.email().to_string();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut email)
                        .desired_width(f32::INFINITY)
                        .hint_text("nom@exemple.fr"),
                );
                if response.changed() {
                    msgs.push(LoginMsg::EmailInput {
                        value: email,
                        at: Instant::now(),
                    });
                }
                if response.lost_focus() {
                    msgs.push(LoginMsg::EmailCommitted);
                }

                ui.add_space(12.0);
                field_label(ui, "Mot de passe", model.annotations().message(&password_id));
                let mut password = model.password().to_string();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut password)
                        .password(true)
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    msgs.push(LoginMsg::PasswordInput(password));
                }
                let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.add_space(16.0);
                form_error(ui, model.annotations().form_error());
                let enabled = model.annotations().submit_enabled() && !model.submitting();
                let submit = ui.add_enabled(
                    enabled,
                    egui::Button::new("Se connecter").min_size(egui::vec2(180.0, 32.0)),
                );
                if model.submitting() {
                    ui.spinner();
                }
                if submit.clicked() || (enter && enabled) {
                    msgs.push(LoginMsg::Submit);
                }
            });
        });

    msgs
}

/// Render the dialog shown after the API rejected the credentials.
pub fn rejected_view(ctx: &egui::Context, view: &ModalView) -> Vec<ModalMsg> {
    let Some(content) = view.mounted() else {
        return Vec::new();
    };
    let title = content.title.clone();
    let chrome = PanelChrome {
        panel: Panel::Main,
        title: &title,
        show_back: false,
        submit_label: "Réessayer",
        submit_enabled: true,
    };
    modal::show(ctx, view, chrome, |ui, _| {
        ui.vertical_centered(|ui| ui.label(REJECTED_MESSAGE));
    })
    .map(|(msgs, ())| msgs)
    .unwrap_or_default()
}
