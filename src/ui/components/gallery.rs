// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Public gallery: category filter buttons and the works grid.

use eframe::egui;

use crate::logic::gallery::filter_works;
use crate::models::work::{ALL_CATEGORIES_ID, Catalog};

const CARD_WIDTH: f32 = 300.0;
const CARD_IMAGE_HEIGHT: f32 = 400.0;

/// Messages emitted by the gallery view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GalleryMsg {
    SelectCategory(u64),
    OpenEditor,
}

/// Read-only inputs for one gallery frame.
pub struct GalleryProps<'a> {
    pub catalog: &'a Catalog,
    pub selected_category: u64,
    /// Logged in: filters are hidden and the editor entry point is shown.
    pub edit_mode: bool,
    pub loading: bool,
    pub scroll_locked: bool,
}

/// Render the gallery section.
pub fn view(ui: &mut egui::Ui, props: GalleryProps<'_>) -> Vec<GalleryMsg> {
    let mut msgs = Vec::new();

    egui::ScrollArea::vertical()
        .vscroll(!props.scroll_locked)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.add_space(16.0);
            ui.vertical_centered(|ui| {
                ui.horizontal(|ui| {
                    ui.heading("Mes Projets");
                    if props.edit_mode
                        && ui
                            .button(format!("{} modifier", egui_phosphor::regular::PENCIL_SIMPLE))
                            .clicked()
                    {
                        msgs.push(GalleryMsg::OpenEditor);
                    }
                });
            });
            ui.add_space(16.0);

            if !props.edit_mode {
                ui.horizontal_wrapped(|ui| {
                    for category in &props.catalog.categories {
                        let selected = category.id == props.selected_category;
                        let clicked = ui
                            .push_id(category.slug(), |ui| {
                                ui.selectable_label(selected, &category.name).clicked()
                            })
                            .inner;
                        if clicked && !selected {
                            msgs.push(GalleryMsg::SelectCategory(category.id));
                        }
                    }
                });
                ui.add_space(16.0);
            }

            if props.loading {
                ui.spinner();
                return;
            }

            let filter = if props.edit_mode {
                ALL_CATEGORIES_ID
            } else {
                props.selected_category
            };
            let works = filter_works(&props.catalog.works, filter);
            if works.is_empty() {
                ui.label("Aucun projet à afficher.");
                return;
            }

            ui.horizontal_wrapped(|ui| {
                for work in works {
                    ui.allocate_ui(egui::vec2(CARD_WIDTH, CARD_IMAGE_HEIGHT + 40.0), |ui| {
                        ui.vertical(|ui| {
                            ui.add(
                                egui::Image::from_uri(&work.image_url)
                                    .max_size(egui::vec2(CARD_WIDTH, CARD_IMAGE_HEIGHT))
                                    .maintain_aspect_ratio(true),
                            );
                            ui.label(&work.title);
                        });
                    });
                }
            });
        });

    msgs
}
