// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring component state, messages, and commands.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;

use crate::logic::gallery::resolve_selected_category;
use crate::logic::modal::{KeyOutcome, ModalContent, ModalControl, ModalController, Panel};
use crate::models::field::SelectedFile;
use crate::models::work::{Catalog, Category, NewWork, Work};
use crate::services::Services;
use crate::services::api::ApiError;
use crate::services::storage::{KEY_CATEGORIES, KEY_SELECTED_CATEGORY, KEY_TOKEN, KEY_WORKS};
use crate::ui::components::CONNECTION_ERROR;
use crate::ui::components::edit_modal::{
    self, EditorCommand, EditorModel, EditorMsg, MAIN_TITLE, SUB_TITLE,
};
use crate::ui::components::gallery::GalleryMsg;
use crate::ui::components::login::{self, LoginCommand, LoginModel, LoginMsg};
use crate::ui::components::modal::ModalMsg;
use crate::ui::components::surface::ModalView;

/// Top-level screens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Gallery,
    Login,
}

/// Which content the modal controller currently shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialog {
    Editor,
    LoginRejected,
}

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Works and categories ("Tous" first).
    pub catalog: Catalog,
    /// False until the first catalog load finished (successfully or not).
    pub catalog_loaded: bool,
    /// Active gallery filter.
    pub selected_category: u64,
    /// Persisted filter, resolved against the catalog once it loads.
    pub saved_category: Option<String>,
    /// Bearer token; present means edit mode.
    pub token: Option<String>,
    pub screen: Screen,
    pub login: LoginModel,
    pub editor: EditorModel,
    pub modal: ModalController,
    /// Rendering surface driven by `modal`.
    pub modal_view: ModalView,
    pub dialog: Option<Dialog>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    /// Model seeded with values restored from the store.
    pub fn restored(token: Option<String>, saved_category: Option<String>) -> Self {
        Self {
            token,
            saved_category,
            ..Self::default()
        }
    }

    pub fn edit_mode(&self) -> bool {
        self.token.is_some()
    }

    /// Earliest debounce deadline of any form.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.login.next_deadline(), self.editor.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

/// Catalog plus where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub from_cache: bool,
}

/// Why a login attempt failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginFailure {
    /// The API answered with this HTTP status.
    Rejected(u16),
    /// The request never got an answer.
    Unreachable(String),
}

/// Application messages routed through the update function.
pub enum Msg {
    CatalogLoaded(Result<LoadedCatalog, String>),
    OpenLogin,
    ShowGallery,
    Logout,
    Gallery(GalleryMsg),
    Login(LoginMsg),
    Editor(EditorMsg),
    Modal(ModalMsg),
    LoginCompleted(Result<String, LoginFailure>),
    WorkDeleted {
        id: u64,
        result: Result<(), String>,
    },
    WorkCreated(Result<Work, String>),
    ImagePickCancelled,
    PreviewDecoded {
        path: PathBuf,
        image: eframe::egui::ColorImage,
    },
    StoreWritten(Result<(), String>),
    Tick(Instant),
    DismissError,
}

/// Commands represent side-effects executed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    LoadCatalog,
    /// Write (`Some`) or remove (`None`) a store entry.
    Persist {
        key: &'static str,
        value: Option<String>,
    },
    CacheWorks(Vec<Work>),
    Login {
        email: String,
        password: String,
    },
    DeleteWork {
        id: u64,
        token: String,
    },
    CreateWork {
        work: NewWork,
        token: String,
    },
    PickImage,
    LoadPreview {
        path: PathBuf,
    },
}

impl Command {
    /// Commands that write the store; they run one at a time in dispatch order.
    pub fn touches_store(&self) -> bool {
        matches!(
            self,
            Command::LoadCatalog | Command::Persist { .. } | Command::CacheWorks(_)
        )
    }
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::CatalogLoaded(result) => {
            model.catalog_loaded = true;
            match result {
                Ok(loaded) => {
                    model.selected_category =
                        resolve_selected_category(model.saved_category.as_deref(), &loaded.catalog);
                    let count = loaded.catalog.works.len();
                    model.catalog = loaded.catalog;
                    if loaded.from_cache {
                        surface_event(
                            model,
                            format!("Hors ligne : {count} projets chargés depuis le cache."),
                            false,
                        );
                    } else {
                        model.status = Some(format!("{count} projets chargés."));
                    }
                }
                Err(err) => {
                    surface_event(model, format!("Impossible de charger les projets :\n\n{err}"), true)
                }
            }
        }
        Msg::Gallery(GalleryMsg::SelectCategory(id)) => {
            model.selected_category = id;
            model.saved_category = Some(id.to_string());
            cmds.push(Command::Persist {
                key: KEY_SELECTED_CATEGORY,
                value: Some(id.to_string()),
            });
        }
        Msg::Gallery(GalleryMsg::OpenEditor) => open_editor(model),
        Msg::OpenLogin => model.screen = Screen::Login,
        Msg::ShowGallery => model.screen = Screen::Gallery,
        Msg::Logout => {
            close_modal(model);
            model.token = None;
            cmds.push(Command::Persist {
                key: KEY_TOKEN,
                value: None,
            });
            log::info!("Logged out");
            model.status = Some("Déconnecté.".into());
        }
        Msg::Login(m) => {
            let mut login_cmds = Vec::new();
            login::update(&mut model.login, m, &mut login_cmds);
            for c in login_cmds {
                match c {
                    LoginCommand::Submit { email, password } => {
                        cmds.push(Command::Login { email, password })
                    }
                }
            }
        }
        Msg::LoginCompleted(result) => match result {
            Ok(token) => {
                log::info!("Login succeeded");
                model.login = LoginModel::default();
                model.token = Some(token.clone());
                model.screen = Screen::Gallery;
                cmds.push(Command::Persist {
                    key: KEY_TOKEN,
                    value: Some(token),
                });
                model.status = Some("Connecté : mode édition.".into());
            }
            Err(LoginFailure::Rejected(status)) => {
                log::info!("Login rejected with status {status}");
                model.login.finish(None);
                model
                    .modal
                    .open(ModalContent::new(status.to_string()), &mut model.modal_view);
                model.dialog = Some(Dialog::LoginRejected);
            }
            Err(LoginFailure::Unreachable(err)) => {
                log::error!("Login request failed: {err}");
                model.login.finish(Some(CONNECTION_ERROR));
            }
        },
        Msg::Editor(m) => editor_update(model, m, cmds),
        Msg::Modal(m) => modal_update(model, m, cmds),
        Msg::WorkDeleted { id, result } => match result {
            Ok(()) => {
                log::info!("Deleted work {id}");
                model.catalog.works.retain(|w| w.id != id);
                model.editor.finish_delete(id, None);
                cmds.push(Command::CacheWorks(model.catalog.works.clone()));
            }
            Err(err) => {
                log::error!("Failed to delete work {id}: {err}");
                model.editor.finish_delete(id, Some(CONNECTION_ERROR));
            }
        },
        Msg::WorkCreated(result) => match result {
            Ok(mut work) => {
                log::info!("Created work {} '{}'", work.id, work.title);
                if work.category.is_none() {
                    work.category = work
                        .category_id
                        .and_then(|id| model.catalog.category(id))
                        .cloned();
                }
                model.catalog.works.push(work);
                cmds.push(Command::CacheWorks(model.catalog.works.clone()));
                model.editor.reset_form();
                if let Err(err) = model.modal.show_main(&mut model.modal_view) {
                    log::error!("Cannot return to the gallery panel: {err}");
                }
                model.status = Some("Projet ajouté.".into());
            }
            Err(err) => {
                log::error!("Failed to create work: {err}");
                model.editor.fail_create(CONNECTION_ERROR);
            }
        },
        Msg::ImagePickCancelled => model.status = Some("Sélection annulée.".into()),
        Msg::PreviewDecoded { path, image: _ } => {
            // Textures are created in the UI loop where the egui context lives.
            log::debug!("Decoded preview for {} reached update", path.display());
        }
        Msg::StoreWritten(result) => {
            if let Err(err) = result {
                log::warn!("Failed to persist state: {err}");
                model.status = Some(format!("Sauvegarde locale impossible : {err}"));
            }
        }
        Msg::Tick(now) => {
            login::update(&mut model.login, LoginMsg::Tick(now), &mut Vec::new());
            edit_modal::update(&mut model.editor, EditorMsg::Tick(now), &mut Vec::new());
        }
        Msg::DismissError => model.error = None,
    }
}

/// Route a Tab press to the modal focus trap.
pub fn handle_modal_tab(model: &mut AppModel, shift: bool) -> KeyOutcome {
    model.modal.handle_tab(shift, &mut model.modal_view)
}

fn open_editor(model: &mut AppModel) {
    if !model.edit_mode() {
        log::warn!("Editor requested without a session");
        return;
    }
    model.editor = EditorModel::default();
    model.modal.open(
        ModalContent::new(MAIN_TITLE).with_sub(SUB_TITLE),
        &mut model.modal_view,
    );
    model.dialog = Some(Dialog::Editor);
}

fn close_modal(model: &mut AppModel) {
    model.modal.close(&mut model.modal_view);
    model.dialog = None;
}

fn modal_update(model: &mut AppModel, msg: ModalMsg, cmds: &mut Vec<Command>) {
    match msg {
        ModalMsg::Frame(frame) => model.modal_view.apply_frame(frame),
        ModalMsg::Pointer(target) => {
            if model.modal.handle_pointer(target, &mut model.modal_view) {
                model.dialog = None;
            }
        }
        ModalMsg::Control(control) => activate(model, control),
        ModalMsg::Submit(panel) => match (model.dialog, panel) {
            (Some(Dialog::Editor), Panel::Main) => activate(model, ModalControl::Advance),
            (Some(Dialog::Editor), Panel::Sub) => editor_update(model, EditorMsg::Submit, cmds),
            (Some(Dialog::LoginRejected), _) => close_modal(model),
            (None, _) => log::warn!("Submit from a modal that is no longer open"),
        },
    }
}

fn activate(model: &mut AppModel, control: ModalControl) {
    if let Err(err) = model.modal.activate(control, &mut model.modal_view) {
        log::error!("Modal control {control:?} failed: {err}");
    }
    if !model.modal.is_open() {
        model.dialog = None;
    }
}

fn editor_update(model: &mut AppModel, msg: EditorMsg, cmds: &mut Vec<Command>) {
    let mut editor_cmds = Vec::new();
    if let Some(event) = edit_modal::update(&mut model.editor, msg, &mut editor_cmds) {
        surface_event(model, event.message, event.is_error);
    }
    for c in editor_cmds {
        match c {
            EditorCommand::PickImage => cmds.push(Command::PickImage),
            EditorCommand::LoadPreview { path } => cmds.push(Command::LoadPreview { path }),
            EditorCommand::Delete { id } => match &model.token {
                Some(token) => cmds.push(Command::DeleteWork {
                    id,
                    token: token.clone(),
                }),
                None => model.editor.finish_delete(id, Some("Session expirée.")),
            },
            EditorCommand::Create(work) => match &model.token {
                Some(token) => cmds.push(Command::CreateWork {
                    work,
                    token: token.clone(),
                }),
                None => model.editor.fail_create("Session expirée."),
            },
        }
    }
}

/// Execute a command on a worker thread and return a resulting message.
pub fn run_command(cmd: Command, services: &Services) -> Msg {
    match cmd {
        Command::LoadCatalog => {
            Msg::CatalogLoaded(load_catalog(services).map_err(|e| format!("{e:#}")))
        }
        Command::Persist { key, value } => {
            let mut store = services.store();
            let res = match value {
                Some(value) => store.set(key, value),
                None => store.remove(key),
            };
            Msg::StoreWritten(res.map_err(|e| format!("{e:#}")))
        }
        Command::CacheWorks(works) => {
            let res = services.store().set_json(KEY_WORKS, &works);
            Msg::StoreWritten(res.map_err(|e| format!("{e:#}")))
        }
        Command::Login { email, password } => {
            let result = services.api.login(&email, &password).map_err(|err| {
                match err.status() {
                    Some(status) => LoginFailure::Rejected(status.as_u16()),
                    None => LoginFailure::Unreachable(err.to_string()),
                }
            });
            Msg::LoginCompleted(result)
        }
        Command::DeleteWork { id, token } => Msg::WorkDeleted {
            id,
            result: services
                .api
                .delete_work(id, &token)
                .map_err(|e: ApiError| e.to_string()),
        },
        Command::CreateWork { work, token } => Msg::WorkCreated(
            services
                .api
                .create_work(&work, &token)
                .map_err(|e| e.to_string()),
        ),
        Command::PickImage => {
            let file = rfd::FileDialog::new()
                .set_title("Choisir une photo")
                .add_filter("Images", &["jpg", "jpeg", "png"])
                .pick_file();
            match file {
                Some(path) => match SelectedFile::from_path(&path) {
                    Ok(file) => Msg::Editor(EditorMsg::ImageSelected(file)),
                    Err(err) => Msg::Editor(EditorMsg::ImagePickFailed(format!("{err:#}"))),
                },
                None => Msg::ImagePickCancelled,
            }
        }
        Command::LoadPreview { path } => match crate::utils::load_image_preview(&path) {
            Ok(image) => Msg::PreviewDecoded { path, image },
            Err(_) => Msg::Editor(EditorMsg::PreviewFailed { path }),
        },
    }
}

/// Fetch the catalog, refreshing the cache, or fall back to the cached copy.
fn load_catalog(services: &Services) -> anyhow::Result<LoadedCatalog> {
    let fetched = services
        .api
        .works()
        .and_then(|works| Ok((works, services.api.categories()?)));

    match fetched {
        Ok((works, categories)) => {
            log::info!("Loaded {} works from the API", works.len());
            if let Err(err) = cache_catalog(services, &works, &categories) {
                log::warn!("Failed to cache catalog: {err:#}");
            }
            Ok(LoadedCatalog {
                catalog: Catalog::with_all_category(works, categories),
                from_cache: false,
            })
        }
        Err(err) => {
            log::warn!("Catalog request failed, trying cache: {err}");
            let store = services.store();
            let works = store.get_json::<Vec<Work>>(KEY_WORKS);
            let categories = store.get_json::<Vec<Category>>(KEY_CATEGORIES);
            let (Some(works), Some(categories)) = (works, categories) else {
                return Err(err).context("No cached catalog available");
            };
            log::info!("Loaded {} works from cache", works.len());
            Ok(LoadedCatalog {
                catalog: Catalog::with_all_category(works, categories),
                from_cache: true,
            })
        }
    }
}

fn cache_catalog(services: &Services, works: &[Work], categories: &[Category]) -> anyhow::Result<()> {
    let mut store = services.store();
    store.set_json(KEY_WORKS, works)?;
    store.set_json(KEY_CATEGORIES, categories)?;
    Ok(())
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}
