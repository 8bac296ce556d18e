// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Gallery editor: delete works on the main panel, upload a new one on the sub panel.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use eframe::egui;

use crate::logic::modal::Panel;
use crate::logic::validator::FormValidator;
use crate::models::field::{FieldDescriptor, FieldId, FieldValue, SelectedFile};
use crate::models::work::{Catalog, NewWork};
use crate::ui::components::field_label::{field_label, form_error};
use crate::ui::components::modal::{self, ModalMsg, PanelChrome};
use crate::ui::components::surface::{FocusTracker, FormAnnotations, ModalView};
use crate::utils::format_bytes;

pub const IMAGE: &str = "image";
pub const TITLE: &str = "title";
pub const CATEGORY: &str = "category";

pub const MAIN_TITLE: &str = "Galerie photo";
pub const SUB_TITLE: &str = "Ajout photo";

const THUMB_SIZE: egui::Vec2 = egui::vec2(76.0, 102.0);
const PREVIEW_HEIGHT: f32 = 170.0;

/// MVU state for the editor modal.
pub struct EditorModel {
    form: FormValidator,
    annotations: FormAnnotations,
    /// Error shown on the main panel (failed deletion).
    main_error: Option<String>,
    preview: Option<(PathBuf, egui::TextureHandle)>,
    deleting: HashSet<u64>,
    submitting: bool,
}

impl Default for EditorModel {
    fn default() -> Self {
        let mut annotations = FormAnnotations::default();
        let form = FormValidator::attach(
            vec![
                FieldDescriptor::file(IMAGE),
                FieldDescriptor::text(TITLE),
                FieldDescriptor::select(CATEGORY),
            ],
            &mut annotations,
        );
        Self {
            form,
            annotations,
            main_error: None,
            preview: None,
            deleting: HashSet::new(),
            submitting: false,
        }
    }
}

impl EditorModel {
    pub fn annotations(&self) -> &FormAnnotations {
        &self.annotations
    }

    pub fn main_error(&self) -> Option<&str> {
        self.main_error.as_deref()
    }

    pub fn title(&self) -> &str {
        self.form.text(&FieldId::from(TITLE))
    }

    pub fn image(&self) -> Option<&SelectedFile> {
        self.form.file(&FieldId::from(IMAGE))
    }

    /// Selected category id, if any.
    pub fn category(&self) -> Option<u64> {
        self.form.text(&FieldId::from(CATEGORY)).parse().ok()
    }

    pub fn is_deleting(&self, id: u64) -> bool {
        self.deleting.contains(&id)
    }

    pub fn submitting(&self) -> bool {
        self.submitting
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.form.next_deadline()
    }

    /// A deletion request came back.
    pub fn finish_delete(&mut self, id: u64, error: Option<&str>) {
        self.deleting.remove(&id);
        self.main_error = error.map(str::to_string);
    }

    /// An upload request came back with an error; the form keeps its values.
    pub fn fail_create(&mut self, message: &str) {
        self.submitting = false;
        self.annotations.set_form_error(message);
    }

    /// Rebuild the upload form with empty fields.
    pub fn reset_form(&mut self) {
        let main_error = self.main_error.take();
        let deleting = std::mem::take(&mut self.deleting);
        *self = Self {
            main_error,
            deleting,
            ..Self::default()
        };
    }
}

/// Messages emitted by the editor views.
// Debug omitted because TextureHandle is not Debug.
pub enum EditorMsg {
    RequestPickImage,
    ImageSelected(SelectedFile),
    ImagePickFailed(String),
    TitleInput(String),
    TitleCommitted,
    CategorySelected(u64),
    Delete(u64),
    Submit,
    PreviewReady {
        path: PathBuf,
        texture: egui::TextureHandle,
    },
    PreviewFailed {
        path: PathBuf,
    },
    Tick(Instant),
}

/// Side effects requested by the editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorCommand {
    PickImage,
    LoadPreview { path: PathBuf },
    Delete { id: u64 },
    Create(NewWork),
}

/// User feedback emitted by the editor.
pub struct EditorEvent {
    pub message: String,
    pub is_error: bool,
}

/// Update editor state and enqueue side effects.
pub fn update(
    model: &mut EditorModel,
    msg: EditorMsg,
    cmds: &mut Vec<EditorCommand>,
) -> Option<EditorEvent> {
    match msg {
        EditorMsg::RequestPickImage => {
            cmds.push(EditorCommand::PickImage);
            None
        }
        EditorMsg::ImageSelected(file) => {
            let id = FieldId::from(IMAGE);
            let path = file.path.clone();
            model.preview = None;
            model.form.on_change(&id, file, &mut model.annotations);
            if model.form.field_valid(&id) == Some(true) {
                cmds.push(EditorCommand::LoadPreview { path });
            }
            None
        }
        EditorMsg::ImagePickFailed(err) => {
            model.preview = None;
            model
                .form
                .on_change(&FieldId::from(IMAGE), FieldValue::File(None), &mut model.annotations);
            Some(EditorEvent {
                message: format!("Impossible de lire le fichier : {err}"),
                is_error: true,
            })
        }
        EditorMsg::TitleInput(value) => {
            model.form.on_input(
                &FieldId::from(TITLE),
                value,
                Instant::now(),
                &mut model.annotations,
            );
            None
        }
        EditorMsg::TitleCommitted => {
            let id = FieldId::from(TITLE);
            let value = model.form.text(&id).to_string();
            model.form.on_change(&id, value, &mut model.annotations);
            None
        }
        EditorMsg::CategorySelected(category_id) => {
            model.form.on_change(
                &FieldId::from(CATEGORY),
                category_id.to_string(),
                &mut model.annotations,
            );
            None
        }
        EditorMsg::Delete(id) => {
            if model.deleting.insert(id) {
                model.main_error = None;
                cmds.push(EditorCommand::Delete { id });
            }
            None
        }
        EditorMsg::Submit => {
            if model.submitting || !model.form.is_valid() {
                log::debug!("Upload submit ignored while form is invalid or busy");
                return None;
            }
            let (Some(file), Some(category_id)) = (model.image(), model.category()) else {
                log::warn!("Upload form valid but image or category missing");
                return None;
            };
            let work = NewWork {
                image: file.path.clone(),
                title: model.title().trim().to_string(),
                category_id,
            };
            model.submitting = true;
            model.annotations.clear_form_error();
            cmds.push(EditorCommand::Create(work));
            None
        }
        EditorMsg::PreviewReady { path, texture } => {
            if model.image().is_some_and(|f| f.path == path) {
                model.preview = Some((path, texture));
            }
            None
        }
        EditorMsg::PreviewFailed { path } => {
            log::warn!("Preview failed for {}", path.display());
            model.preview = None;
            None
        }
        EditorMsg::Tick(now) => {
            model.form.poll(now, &mut model.annotations);
            None
        }
    }
}

/// Render the editor modal for the visible panel.
pub fn view(
    ctx: &egui::Context,
    model: &EditorModel,
    catalog: &Catalog,
    modal_view: &ModalView,
    panel: Panel,
) -> (Vec<EditorMsg>, Vec<ModalMsg>) {
    let chrome = match panel {
        Panel::Main => PanelChrome {
            panel,
            title: MAIN_TITLE,
            show_back: false,
            submit_label: "Ajouter une photo",
            submit_enabled: true,
        },
        Panel::Sub => PanelChrome {
            panel,
            title: SUB_TITLE,
            show_back: true,
            submit_label: "Valider",
            submit_enabled: model.annotations().submit_enabled() && !model.submitting(),
        },
    };

    let shown = modal::show(ctx, modal_view, chrome, |ui, tracker| {
        let mut msgs = Vec::new();
        match panel {
            Panel::Main => main_body(ui, tracker, model, catalog, &mut msgs),
            Panel::Sub => sub_body(ui, tracker, model, catalog, &mut msgs),
        }
        msgs
    });
    match shown {
        Some((modal_msgs, editor_msgs)) => (editor_msgs, modal_msgs),
        None => (Vec::new(), Vec::new()),
    }
}

fn main_body(
    ui: &mut egui::Ui,
    tracker: &mut FocusTracker<'_>,
    model: &EditorModel,
    catalog: &Catalog,
    msgs: &mut Vec<EditorMsg>,
) {
    form_error(ui, model.main_error());
    egui::ScrollArea::vertical()
        .max_height(360.0)
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for work in &catalog.works {
                    ui.vertical(|ui| {
                        ui.add(egui::Image::from_uri(&work.image_url).fit_to_exact_size(THUMB_SIZE));
                        let enabled = !model.is_deleting(work.id);
                        let delete = ui
                            .add_enabled(
                                enabled,
                                egui::Button::new(egui_phosphor::regular::TRASH).small(),
                            )
                            .on_hover_text(format!("Supprimer « {} »", work.title));
                        tracker.track(Panel::Main, &format!("delete-{}", work.id), enabled, &delete);
                        if delete.clicked() {
                            msgs.push(EditorMsg::Delete(work.id));
                        }
                    });
                }
            });
        });
}

fn sub_body(
    ui: &mut egui::Ui,
    tracker: &mut FocusTracker<'_>,
    model: &EditorModel,
    catalog: &Catalog,
    msgs: &mut Vec<EditorMsg>,
) {
    let image_id = FieldId::from(IMAGE);
    let title_id = FieldId::from(TITLE);
    let category_id = FieldId::from(CATEGORY);

    field_label(ui, "Image", model.annotations().message(&image_id));
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_height(PREVIEW_HEIGHT);
        ui.vertical_centered(|ui| match &model.preview {
            Some((_, texture)) => {
                let size = texture.size_vec2();
                let scale = (PREVIEW_HEIGHT / size.y).min(1.0);
                let response = ui.add(
                    egui::Image::new((texture.id(), size * scale))
                        .sense(egui::Sense::click()),
                );
                tracker.track(Panel::Sub, "preview", true, &response);
                if response.clicked() {
                    msgs.push(EditorMsg::RequestPickImage);
                }
            }
            None => {
                ui.label(egui::RichText::new(egui_phosphor::regular::IMAGE).size(56.0));
                let pick = ui.button("+ Ajouter photo");
                tracker.track(Panel::Sub, "pick-image", true, &pick);
                if pick.clicked() {
                    msgs.push(EditorMsg::RequestPickImage);
                }
                match model.image() {
                    Some(file) => ui.label(format!(
                        "{} ({})",
                        file.file_name(),
                        format_bytes(file.size)
                    )),
                    None => ui.small("jpg, png : 4mo max"),
                };
            }
        });
    });

    ui.add_space(12.0);
    field_label(ui, "Titre", model.annotations().message(&title_id));
    let mut title = model.title().to_string();
    let response = ui.add(egui::TextEdit::singleline(&mut title).desired_width(f32::INFINITY));
    tracker.track(Panel::Sub, "title", true, &response);
    if response.changed() {
        msgs.push(EditorMsg::TitleInput(title));
    }
    if response.lost_focus() {
        msgs.push(EditorMsg::TitleCommitted);
    }

    ui.add_space(12.0);
    field_label(ui, "Catégorie", model.annotations().message(&category_id));
    let selected_name = model
        .category()
        .and_then(|id| catalog.category(id))
        .map(|c| c.name.clone())
        .unwrap_or_default();
    let combo = egui::ComboBox::from_id_salt("folio_category_select")
        .width(ui.available_width())
        .selected_text(selected_name)
        .show_ui(ui, |ui| {
            for category in catalog.assignable_categories() {
                let selected = model.category() == Some(category.id);
                if ui.selectable_label(selected, &category.name).clicked() {
                    msgs.push(EditorMsg::CategorySelected(category.id));
                }
            }
        });
    tracker.track(Panel::Sub, "category", true, &combo.response);

    ui.add_space(8.0);
    form_error(ui, model.annotations().form_error());
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn png_file(dir: &TempDir, name: &str, size: u64) -> SelectedFile {
        let path = dir.path().join(name);
        fs::write(&path, b"png").unwrap();
        SelectedFile::new(path, size, "image/png")
    }

    fn fill_form(model: &mut EditorModel, file: SelectedFile) -> Vec<EditorCommand> {
        let mut cmds = Vec::new();
        update(model, EditorMsg::ImageSelected(file), &mut cmds);
        update(model, EditorMsg::TitleInput("Villa".into()), &mut cmds);
        update(model, EditorMsg::CategorySelected(2), &mut cmds);
        cmds
    }

    #[test]
    fn valid_image_requests_preview() {
        let dir = TempDir::new().unwrap();
        let file = png_file(&dir, "villa.png", 1024);
        let mut model = EditorModel::default();
        let mut cmds = Vec::new();

        update(&mut model, EditorMsg::ImageSelected(file.clone()), &mut cmds);

        assert_eq!(cmds, vec![EditorCommand::LoadPreview { path: file.path }]);
        assert!(!model.annotations().is_annotated(&FieldId::from(IMAGE)));
    }

    // Oversized files are annotated and never previewed.
    #[test]
    fn oversized_image_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = png_file(&dir, "huge.png", 5 * 1024 * 1024);
        let mut model = EditorModel::default();
        let mut cmds = Vec::new();

        update(&mut model, EditorMsg::ImageSelected(file), &mut cmds);

        assert!(cmds.is_empty());
        assert_eq!(
            model.annotations().message(&FieldId::from(IMAGE)),
            Some("La taille doit être inférieur à 4 Mo")
        );
    }

    #[test]
    fn complete_form_enables_submit_and_builds_upload() {
        let dir = TempDir::new().unwrap();
        let file = png_file(&dir, "villa.png", 1024);
        let mut model = EditorModel::default();
        assert!(!model.annotations().submit_enabled());

        fill_form(&mut model, file.clone());
        assert!(model.annotations().submit_enabled());

        let mut cmds = Vec::new();
        update(&mut model, EditorMsg::Submit, &mut cmds);
        update(&mut model, EditorMsg::Submit, &mut cmds);

        assert_eq!(
            cmds,
            vec![EditorCommand::Create(NewWork {
                image: file.path,
                title: "Villa".into(),
                category_id: 2,
            })]
        );
        assert!(model.submitting());
    }

    #[test]
    fn failed_upload_keeps_values_and_shows_error() {
        let dir = TempDir::new().unwrap();
        let mut model = EditorModel::default();
        fill_form(&mut model, png_file(&dir, "villa.png", 1024));
        update(&mut model, EditorMsg::Submit, &mut Vec::new());

        model.fail_create("Problème de connexion. Réessayez plus tard.");

        assert!(!model.submitting());
        assert_eq!(model.title(), "Villa");
        assert!(model.annotations().submit_enabled());
        assert!(model.annotations().form_error().is_some());
    }

    #[test]
    fn reset_form_clears_fields() {
        let dir = TempDir::new().unwrap();
        let mut model = EditorModel::default();
        fill_form(&mut model, png_file(&dir, "villa.png", 1024));

        model.reset_form();

        assert_eq!(model.title(), "");
        assert!(model.image().is_none());
        assert_eq!(model.category(), None);
        assert!(!model.annotations().submit_enabled());
    }

    #[test]
    fn duplicate_delete_is_ignored_until_finished() {
        let mut model = EditorModel::default();
        let mut cmds = Vec::new();

        update(&mut model, EditorMsg::Delete(3), &mut cmds);
        update(&mut model, EditorMsg::Delete(3), &mut cmds);
        assert_eq!(cmds, vec![EditorCommand::Delete { id: 3 }]);
        assert!(model.is_deleting(3));

        model.finish_delete(3, Some("Problème de connexion. Réessayez plus tard."));
        assert!(!model.is_deleting(3));
        assert!(model.main_error().is_some());
    }
}
