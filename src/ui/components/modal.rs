// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared modal chrome: overlay, header controls, title, body and submit button.

use eframe::egui;

use crate::logic::modal::{ModalControl, Panel, PointerTarget};
use crate::ui::components::surface::{FocusFrame, FocusTracker, ModalView};

const MODAL_WIDTH: f32 = 460.0;

/// Messages emitted by the modal chrome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalMsg {
    Control(ModalControl),
    Pointer(PointerTarget),
    /// The panel's submit button was activated.
    Submit(Panel),
    Frame(FocusFrame),
}

/// Static description of the visible panel.
pub struct PanelChrome<'a> {
    pub panel: Panel,
    pub title: &'a str,
    pub show_back: bool,
    pub submit_label: &'a str,
    pub submit_enabled: bool,
}

/// Render the mounted modal with `body` between the title and the submit button.
///
/// Returns nothing when no modal is mounted.
pub fn show<R>(
    ctx: &egui::Context,
    view: &ModalView,
    chrome: PanelChrome<'_>,
    body: impl FnOnce(&mut egui::Ui, &mut FocusTracker<'_>) -> R,
) -> Option<(Vec<ModalMsg>, R)> {
    let content = view.mounted()?;
    let panel = chrome.panel;
    let mut msgs = Vec::new();
    let mut tracker = FocusTracker::new(view);

    let response = egui::Modal::new(egui::Id::new(("folio_modal", content.id.as_str()))).show(
        ctx,
        |ui| {
            ui.set_width(MODAL_WIDTH);
            ui.horizontal(|ui| {
                if chrome.show_back {
                    let back = ui
                        .button(egui_phosphor::regular::ARROW_LEFT)
                        .on_hover_text("Retour");
                    tracker.track(panel, "back", true, &back);
                    if back.clicked() {
                        msgs.push(ModalMsg::Control(ModalControl::Back));
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let close = ui
                        .button(egui_phosphor::regular::X)
                        .on_hover_text("Fermer");
                    tracker.track(panel, "close", true, &close);
                    if close.clicked() {
                        msgs.push(ModalMsg::Control(ModalControl::Close));
                    }
                });
            });

            ui.vertical_centered(|ui| ui.heading(chrome.title));
            ui.add_space(12.0);

            let inner = body(ui, &mut tracker);

            ui.add_space(8.0);
            ui.separator();
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                let submit = ui.add_enabled(
                    chrome.submit_enabled,
                    egui::Button::new(chrome.submit_label).min_size(egui::vec2(220.0, 32.0)),
                );
                tracker.track(panel, "submit", chrome.submit_enabled, &submit);
                if submit.clicked() {
                    msgs.push(ModalMsg::Submit(panel));
                }
            });
            inner
        },
    );

    // Inner clicks are handled by the panel and never reach the overlay.
    if response.backdrop_response.clicked() {
        msgs.push(ModalMsg::Pointer(PointerTarget::Overlay));
    } else if response.response.clicked() {
        msgs.push(ModalMsg::Pointer(PointerTarget::Panel(panel)));
    }
    msgs.push(ModalMsg::Frame(tracker.finish()));

    Some((msgs, response.inner))
}
