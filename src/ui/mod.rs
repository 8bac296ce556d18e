// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for the portfolio.
//! Handles layout, the modal dialogs, and wiring to the command workers.

pub mod components;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::logic::modal::{KeyOutcome, Panel};
use crate::mvu::{self, AppModel, Command, Dialog, Msg, Screen};
use crate::services::Services;
use crate::ui::components::edit_modal::{self, EditorMsg};
use crate::ui::components::gallery::{self, GalleryProps};
use crate::ui::components::login;
use crate::ui::components::modal::ModalMsg;

/// Poll interval while worker results are outstanding.
const WORKER_POLL: Duration = Duration::from_millis(100);

/// Command senders: a worker pool plus one serial worker for store writes.
struct Workers {
    pool: crossbeam_channel::Sender<Command>,
    store: crossbeam_channel::Sender<Command>,
}

impl Workers {
    fn spawn(services: &Services, threads: usize, msg_tx: &crossbeam_channel::Sender<Msg>) -> Self {
        let (pool, pool_rx) = crossbeam_channel::unbounded::<Command>();
        let (store, store_rx) = crossbeam_channel::unbounded::<Command>();
        for _ in 0..threads {
            spawn_worker(pool_rx.clone(), msg_tx.clone(), services.clone());
        }
        spawn_worker(store_rx, msg_tx.clone(), services.clone());
        Self { pool, store }
    }

    fn send(&self, cmd: Command) -> bool {
        let lane = if cmd.touches_store() {
            &self.store
        } else {
            &self.pool
        };
        lane.send(cmd).is_ok()
    }
}

fn spawn_worker(
    cmd_rx: crossbeam_channel::Receiver<Command>,
    msg_tx: crossbeam_channel::Sender<Msg>,
    services: Services,
) {
    std::thread::spawn(move || {
        for cmd in cmd_rx.iter() {
            let msg = mvu::run_command(cmd, &services);
            let _ = msg_tx.send(msg);
        }
    });
}

/// Stateful egui application for browsing and editing the portfolio.
pub struct FolioApp {
    model: AppModel,
    inbox: Vec<Msg>,
    workers: Workers,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl FolioApp {
    /// Spawn the command workers and start loading the catalog.
    pub fn new(services: Services, model: AppModel) -> Self {
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().clamp(2, 4))
            .unwrap_or(2);
        let workers = Workers::spawn(&services, threads, &msg_tx);

        let mut app = Self {
            model,
            inbox: Vec::new(),
            workers,
            msg_rx,
        };
        app.dispatch(Command::LoadCatalog);
        app
    }

    fn dispatch(&mut self, cmd: Command) {
        if self.workers.send(cmd) {
            self.model.pending_commands += 1;
        }
    }
}

impl eframe::App for FolioApp {
    /// Required by eframe 0.34; all rendering happens in `update`, which
    /// eframe still calls before `ui` each frame.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    /// Drives a single UI frame: applies worker results and queued messages,
    /// routes Tab presses through the modal focus trap, then renders.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_spacing(ctx);
        let now = Instant::now();

        // Pull messages produced by the command workers.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }
        self.inbox.push(Msg::Tick(now));

        // Process pending messages in arrival order.
        let mut queue: VecDeque<Msg> = std::mem::take(&mut self.inbox).into();
        while let Some(msg) = queue.pop_front() {
            match msg {
                Msg::PreviewDecoded { path, image } => {
                    let texture = ctx.load_texture(
                        format!("preview-{}", path.display()),
                        image,
                        egui::TextureOptions::default(),
                    );
                    queue.push_back(Msg::Editor(EditorMsg::PreviewReady { path, texture }));
                }
                other => {
                    let mut commands = Vec::new();
                    mvu::update(&mut self.model, other, &mut commands);
                    for cmd in commands {
                        self.dispatch(cmd);
                    }
                }
            }
        }

        self.trap_tab(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Folio");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_space(2.0);
                    egui::widgets::global_theme_preference_switch(ui);
                    ui.separator();
                    self.render_session_controls(ui);
                });
            });
            ui.add_space(4.0);
        });

        if self.model.edit_mode() {
            egui::TopBottomPanel::top("edit_banner")
                .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(4.0);
                        ui.label(
                            egui::RichText::new(format!(
                                "{} Mode édition",
                                egui_phosphor::regular::PENCIL_SIMPLE
                            ))
                            .color(egui::Color32::WHITE),
                        );
                        ui.add_space(4.0);
                    });
                });
        }

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| match self.model.screen {
            Screen::Gallery => {
                let msgs = gallery::view(
                    ui,
                    GalleryProps {
                        catalog: &self.model.catalog,
                        selected_category: self.model.selected_category,
                        edit_mode: self.model.edit_mode(),
                        loading: !self.model.catalog_loaded,
                        scroll_locked: self.model.modal_view.scroll_locked(),
                    },
                );
                self.inbox.extend(msgs.into_iter().map(Msg::Gallery));
            }
            Screen::Login => {
                let msgs = login::view(ui, &self.model.login, self.model.modal_view.scroll_locked());
                self.inbox.extend(msgs.into_iter().map(Msg::Login));
            }
        });

        self.render_dialog(ctx);

        // Focus frames alone never need another pass.
        let follow_up = self
            .inbox
            .iter()
            .any(|m| !matches!(m, Msg::Modal(ModalMsg::Frame(_))));
        if follow_up {
            ctx.request_repaint();
        } else if let Some(deadline) = self.model.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        } else if self.model.pending_commands > 0 {
            ctx.request_repaint_after(WORKER_POLL);
        }
    }
}

impl FolioApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    /// Wrap Tab/Shift+Tab inside the visible modal panel before widgets see the key.
    fn trap_tab(&mut self, ctx: &egui::Context) {
        if !self.model.modal.is_open() {
            return;
        }
        let Some(shift) = ctx.input(|i| i.key_pressed(egui::Key::Tab).then_some(i.modifiers.shift))
        else {
            return;
        };
        if mvu::handle_modal_tab(&mut self.model, shift) == KeyOutcome::Prevented
        {
            let modifiers = if shift {
                egui::Modifiers::SHIFT
            } else {
                egui::Modifiers::NONE
            };
            ctx.input_mut(|i| {
                i.consume_key(modifiers, egui::Key::Tab);
            });
            ctx.memory_mut(|mem| mem.move_focus(egui::FocusDirection::None));
        }
    }

    /// Login/logout entry points in the top bar.
    fn render_session_controls(&mut self, ui: &mut egui::Ui) {
        if self.model.edit_mode() {
            let logout = format!("{} logout", egui_phosphor::regular::SIGN_OUT);
            if ui.button(logout).clicked() {
                self.inbox.push(Msg::Logout);
            }
            return;
        }
        match self.model.screen {
            Screen::Gallery => {
                let label = format!("{} login", egui_phosphor::regular::SIGN_IN);
                if ui.button(label).clicked() {
                    self.inbox.push(Msg::OpenLogin);
                }
            }
            Screen::Login => {
                let label = format!("{} projets", egui_phosphor::regular::SQUARES_FOUR);
                if ui.button(label).clicked() {
                    self.inbox.push(Msg::ShowGallery);
                }
            }
        }
    }

    /// Render whichever dialog the modal controller has mounted.
    fn render_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.model.dialog else {
            return;
        };
        let modal_msgs = match dialog {
            Dialog::Editor => {
                let panel = if self.model.modal_view.is_visible(Panel::Sub) {
                    Panel::Sub
                } else {
                    Panel::Main
                };
                let (editor_msgs, modal_msgs) = edit_modal::view(
                    ctx,
                    &self.model.editor,
                    &self.model.catalog,
                    &self.model.modal_view,
                    panel,
                );
                self.inbox.extend(editor_msgs.into_iter().map(Msg::Editor));
                modal_msgs
            }
            Dialog::LoginRejected => login::rejected_view(ctx, &self.model.modal_view),
        };
        self.inbox.extend(modal_msgs.into_iter().map(Msg::Modal));
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Erreur")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status/error message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        if let Some(text) = &self.model.status {
            let display = if self.model.pending_commands > 0 {
                format!("{}  ({} en cours…)", text, self.model.pending_commands)
            } else {
                text.to_string()
            };
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(display).color(egui::Color32::from_gray(68)));
                if self.model.pending_commands > 0 {
                    ui.add(egui::Spinner::new().size(14.0)).on_hover_text(format!(
                        "{} tâche(s) en arrière-plan",
                        self.model.pending_commands
                    ));
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use url::Url;

    use super::*;
    use crate::config::Config;
    use crate::services::api::ApiClient;
    use crate::services::storage::{KEY_SELECTED_CATEGORY, KeyValueStore};

    fn offline_services() -> Services {
        let config = Config {
            api_base: Url::parse("http://127.0.0.1:9/api/").unwrap(),
            data_dir: PathBuf::from("/tmp"),
            http_timeout: Duration::from_millis(300),
        };
        Services::new(ApiClient::new(&config).unwrap(), KeyValueStore::in_memory())
    }

    // Writes issued back to back land in dispatch order even with a wide pool.
    #[test]
    fn store_writes_apply_in_dispatch_order() {
        let services = offline_services();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();
        let workers = Workers::spawn(&services, 4, &msg_tx);

        for value in 0..200 {
            assert!(workers.send(Command::Persist {
                key: KEY_SELECTED_CATEGORY,
                value: Some(value.to_string()),
            }));
        }
        for _ in 0..200 {
            let msg = msg_rx.recv_timeout(Duration::from_secs(5)).unwrap();
            assert!(matches!(msg, Msg::StoreWritten(Ok(()))));
        }

        assert_eq!(services.store().get(KEY_SELECTED_CATEGORY), Some("199"));
    }
}
