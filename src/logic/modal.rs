// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Modal lifecycle with a two-panel (main/sub) stack and a keyboard focus trap.
//!
//! The controller owns which modal is open and which panel is visible; the
//! rendering side is reached only through [`ModalSurface`].

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::utils::slugify;

/// The two co-resident panels of a modal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Panel {
    Main,
    Sub,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Identity of an interactive element inside a modal panel.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What to mount: the main panel title and an optional sub panel title.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalContent {
    pub id: String,
    pub title: String,
    pub sub_title: Option<String>,
}

impl ModalContent {
    /// Single-panel modal; the id is the slug of the title.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: slugify(&title),
            title,
            sub_title: None,
        }
    }

    pub fn with_sub(mut self, sub_title: impl Into<String>) -> Self {
        self.sub_title = Some(sub_title.into());
        self
    }

    pub fn has_sub(&self) -> bool {
        self.sub_title.is_some()
    }
}

/// Capabilities the controller needs from whatever renders the modal.
pub trait ModalSurface {
    fn mount(&mut self, content: &ModalContent);
    fn unmount(&mut self, id: &str);
    fn set_scroll_locked(&mut self, locked: bool);
    fn set_panel_visibility(&mut self, panel: Panel, visibility: Visibility);
    /// Interactive, enabled elements of `panel` in render order.
    fn focusable_elements(&self, panel: Panel) -> Vec<ElementId>;
    fn focused_element(&self) -> Option<ElementId>;
    fn focus(&mut self, element: &ElementId);
}

/// Whether the host should suppress its default handling of the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Default,
    Prevented,
}

/// Where a pointer interaction landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    /// The overlay background itself, outside every panel.
    Overlay,
    /// Anywhere inside a panel; never closes the modal.
    Panel(Panel),
}

/// Built-in modal controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalControl {
    Close,
    /// "Back" on the sub panel.
    Back,
    /// "Advance" on the main panel (e.g. add a new item).
    Advance,
}

/// Misuse of the controller: the caller asked for something that is not there.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ModalError {
    #[error("no modal is open")]
    NotOpen,
    #[error("modal '{0}' has no sub panel")]
    NoSubPanel(String),
}

struct OpenModal {
    content: ModalContent,
    visible: Panel,
    /// Last focused element per panel, restored when the panel is shown again.
    remembered: HashMap<Panel, ElementId>,
}

/// Opens, switches and closes at most one modal at a time.
#[derive(Default)]
pub struct ModalController {
    current: Option<OpenModal>,
}

impl ModalController {
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    #[cfg(test)]
    pub fn modal_id(&self) -> Option<&str> {
        self.current.as_ref().map(|m| m.content.id.as_str())
    }

    #[cfg(test)]
    pub fn content(&self) -> Option<&ModalContent> {
        self.current.as_ref().map(|m| &m.content)
    }

    pub fn visible_panel(&self) -> Option<Panel> {
        self.current.as_ref().map(|m| m.visible)
    }

    /// Mount a modal, lock page scroll and focus the first element of the main panel.
    ///
    /// An already open modal is closed first.
    pub fn open(&mut self, content: ModalContent, surface: &mut impl ModalSurface) {
        if self.is_open() {
            log::warn!("Replacing open modal with '{}'", content.id);
            self.close(surface);
        }

        surface.mount(&content);
        surface.set_panel_visibility(Panel::Main, Visibility::Visible);
        if content.has_sub() {
            surface.set_panel_visibility(Panel::Sub, Visibility::Hidden);
        }
        surface.set_scroll_locked(true);
        log::debug!("Opened modal '{}'", content.id);

        self.current = Some(OpenModal {
            content,
            visible: Panel::Main,
            remembered: HashMap::new(),
        });
        self.focus_panel(Panel::Main, surface);
    }

    /// Unmount the modal and restore scroll. Returns false when nothing was open.
    pub fn close(&mut self, surface: &mut impl ModalSurface) -> bool {
        let Some(modal) = self.current.take() else {
            return false;
        };
        surface.unmount(&modal.content.id);
        surface.set_scroll_locked(false);
        log::debug!("Closed modal '{}'", modal.content.id);
        true
    }

    pub fn show_sub(&mut self, surface: &mut impl ModalSurface) -> Result<(), ModalError> {
        self.show_panel(Panel::Sub, surface)
    }

    pub fn show_main(&mut self, surface: &mut impl ModalSurface) -> Result<(), ModalError> {
        self.show_panel(Panel::Main, surface)
    }

    /// Make exactly `panel` visible and trap focus inside it.
    fn show_panel(
        &mut self,
        panel: Panel,
        surface: &mut impl ModalSurface,
    ) -> Result<(), ModalError> {
        let modal = self.current.as_mut().ok_or(ModalError::NotOpen)?;
        if !modal.content.has_sub() {
            return Err(ModalError::NoSubPanel(modal.content.id.clone()));
        }

        if let Some(focused) = surface.focused_element()
            && surface.focusable_elements(modal.visible).contains(&focused)
        {
            modal.remembered.insert(modal.visible, focused);
        }

        let hidden = match panel {
            Panel::Main => Panel::Sub,
            Panel::Sub => Panel::Main,
        };
        surface.set_panel_visibility(hidden, Visibility::Hidden);
        surface.set_panel_visibility(panel, Visibility::Visible);
        modal.visible = panel;

        self.focus_panel(panel, surface);
        Ok(())
    }

    /// Activate one of the built-in controls.
    pub fn activate(
        &mut self,
        control: ModalControl,
        surface: &mut impl ModalSurface,
    ) -> Result<(), ModalError> {
        match control {
            ModalControl::Close => {
                if self.close(surface) {
                    Ok(())
                } else {
                    Err(ModalError::NotOpen)
                }
            }
            ModalControl::Back => self.show_main(surface),
            ModalControl::Advance => self.show_sub(surface),
        }
    }

    /// Close when the pointer hit the overlay background. Returns true when closed.
    pub fn handle_pointer(
        &mut self,
        target: PointerTarget,
        surface: &mut impl ModalSurface,
    ) -> bool {
        match target {
            PointerTarget::Overlay => self.close(surface),
            PointerTarget::Panel(_) => false,
        }
    }

    /// Keep Tab (`shift` false) and Shift+Tab cycling inside the visible panel.
    ///
    /// The focusable list is fetched on every press because enabled states
    /// change while the modal is open (e.g. a submit button becoming active).
    pub fn handle_tab(&mut self, shift: bool, surface: &mut impl ModalSurface) -> KeyOutcome {
        let Some(panel) = self.visible_panel() else {
            return KeyOutcome::Default;
        };

        let elements = surface.focusable_elements(panel);
        let (Some(first), Some(last)) = (elements.first(), elements.last()) else {
            return KeyOutcome::Default;
        };
        let focused = surface.focused_element();

        let target = match (shift, focused.as_ref()) {
            (true, Some(current)) if current == first => last,
            (false, Some(current)) if current == last => first,
            _ => return KeyOutcome::Default,
        };
        log::debug!("Focus trap wraps to '{target}'");
        surface.focus(target);
        KeyOutcome::Prevented
    }

    fn focus_panel(&mut self, panel: Panel, surface: &mut impl ModalSurface) {
        let elements = surface.focusable_elements(panel);
        let remembered = self
            .current
            .as_ref()
            .and_then(|m| m.remembered.get(&panel))
            .filter(|id| elements.contains(id));
        if let Some(target) = remembered.or(elements.first()) {
            surface.focus(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// In-memory modal surface with per-panel elements and an enabled flag each.
    #[derive(Default)]
    struct FakeSurface {
        mounted: Option<String>,
        scroll_locked: bool,
        visibility: HashMap<Panel, Visibility>,
        elements: HashMap<Panel, Vec<(ElementId, bool)>>,
        focused: Option<ElementId>,
    }

    impl FakeSurface {
        fn with_panels(main: &[&str], sub: &[&str]) -> Self {
            let mut surface = Self::default();
            surface.elements.insert(
                Panel::Main,
                main.iter().map(|id| (ElementId::from(*id), true)).collect(),
            );
            surface.elements.insert(
                Panel::Sub,
                sub.iter().map(|id| (ElementId::from(*id), true)).collect(),
            );
            surface
        }

        fn set_enabled(&mut self, panel: Panel, id: &str, enabled: bool) {
            if let Some(entry) = self
                .elements
                .get_mut(&panel)
                .and_then(|list| list.iter_mut().find(|(el, _)| el.as_str() == id))
            {
                entry.1 = enabled;
            }
        }

        fn focused(&self) -> Option<&str> {
            self.focused.as_ref().map(ElementId::as_str)
        }

        fn visible(&self, panel: Panel) -> bool {
            self.visibility.get(&panel) == Some(&Visibility::Visible)
        }
    }

    impl ModalSurface for FakeSurface {
        fn mount(&mut self, content: &ModalContent) {
            self.mounted = Some(content.id.clone());
        }

        fn unmount(&mut self, id: &str) {
            assert_eq!(self.mounted.as_deref(), Some(id));
            self.mounted = None;
            self.visibility.clear();
        }

        fn set_scroll_locked(&mut self, locked: bool) {
            self.scroll_locked = locked;
        }

        fn set_panel_visibility(&mut self, panel: Panel, visibility: Visibility) {
            self.visibility.insert(panel, visibility);
        }

        fn focusable_elements(&self, panel: Panel) -> Vec<ElementId> {
            self.elements
                .get(&panel)
                .map(|list| {
                    list.iter()
                        .filter(|(_, enabled)| *enabled)
                        .map(|(id, _)| id.clone())
                        .collect()
                })
                .unwrap_or_default()
        }

        fn focused_element(&self) -> Option<ElementId> {
            self.focused.clone()
        }

        fn focus(&mut self, element: &ElementId) {
            self.focused = Some(element.clone());
        }
    }

    fn gallery_modal() -> ModalContent {
        ModalContent::new("Galerie photo").with_sub("Ajout photo")
    }

    const TAB: bool = false;
    const SHIFT_TAB: bool = true;

    #[test]
    fn open_mounts_locks_scroll_and_focuses_first() {
        let mut surface = FakeSurface::with_panels(&["close", "delete-1", "add"], &["back"]);
        let mut modal = ModalController::default();

        modal.open(gallery_modal(), &mut surface);

        assert_eq!(surface.mounted.as_deref(), Some("galerie-photo"));
        assert!(surface.scroll_locked);
        assert!(surface.visible(Panel::Main));
        assert!(!surface.visible(Panel::Sub));
        assert_eq!(surface.focused(), Some("close"));
    }

    #[test]
    fn close_unmounts_and_restores_scroll() {
        let mut surface = FakeSurface::with_panels(&["close"], &[]);
        let mut modal = ModalController::default();
        modal.open(ModalContent::new("401"), &mut surface);

        assert!(modal.close(&mut surface));

        assert!(surface.mounted.is_none());
        assert!(!surface.scroll_locked);
        assert!(!modal.is_open());
        assert!(!modal.close(&mut surface), "second close is a no-op");
    }

    // Tab on the last element wraps to the first; Shift+Tab on the first wraps to the last.
    #[test]
    fn focus_trap_wraps_both_directions() {
        let mut surface = FakeSurface::with_panels(&["close", "delete-1", "add"], &[]);
        let mut modal = ModalController::default();
        modal.open(ModalContent::new("Galerie photo"), &mut surface);

        surface.focused = Some("add".into());
        assert_eq!(modal.handle_tab(TAB, &mut surface), KeyOutcome::Prevented);
        assert_eq!(surface.focused(), Some("close"));

        assert_eq!(modal.handle_tab(SHIFT_TAB, &mut surface), KeyOutcome::Prevented);
        assert_eq!(surface.focused(), Some("add"));
    }

    // Tabbing between interior elements keeps the host's default order.
    #[test]
    fn focus_trap_allows_default_in_the_middle() {
        let mut surface = FakeSurface::with_panels(&["close", "delete-1", "add"], &[]);
        let mut modal = ModalController::default();
        modal.open(ModalContent::new("Galerie photo"), &mut surface);

        assert_eq!(modal.handle_tab(TAB, &mut surface), KeyOutcome::Default);
        surface.focused = Some("delete-1".into());
        assert_eq!(modal.handle_tab(SHIFT_TAB, &mut surface), KeyOutcome::Default);
        assert_eq!(surface.focused(), Some("delete-1"));
    }

    // A submit button that becomes enabled joins the cycle on the next Tab.
    #[test]
    fn focus_trap_recomputes_enabled_elements() {
        let mut surface =
            FakeSurface::with_panels(&["add"], &["back", "close", "image", "title", "submit"]);
        surface.set_enabled(Panel::Sub, "submit", false);
        let mut modal = ModalController::default();
        modal.open(gallery_modal(), &mut surface);
        modal.show_sub(&mut surface).unwrap();

        surface.focused = Some("title".into());
        assert_eq!(modal.handle_tab(TAB, &mut surface), KeyOutcome::Prevented);
        assert_eq!(surface.focused(), Some("back"));

        surface.set_enabled(Panel::Sub, "submit", true);
        surface.focused = Some("title".into());
        assert_eq!(modal.handle_tab(TAB, &mut surface), KeyOutcome::Default);
        surface.focused = Some("submit".into());
        assert_eq!(modal.handle_tab(TAB, &mut surface), KeyOutcome::Prevented);
        assert_eq!(surface.focused(), Some("back"));
    }

    #[test]
    fn focus_trap_with_no_elements_is_inert() {
        let mut surface = FakeSurface::default();
        let mut modal = ModalController::default();
        modal.open(ModalContent::new("Vide"), &mut surface);

        assert_eq!(modal.handle_tab(TAB, &mut surface), KeyOutcome::Default);
        assert!(surface.focused.is_none());
    }

    // Clicks inside a panel never close; the overlay background does.
    #[test]
    fn pointer_on_panel_keeps_modal_open() {
        let mut surface = FakeSurface::with_panels(&["close"], &["back"]);
        let mut modal = ModalController::default();
        modal.open(gallery_modal(), &mut surface);

        assert!(!modal.handle_pointer(PointerTarget::Panel(Panel::Main), &mut surface));
        assert!(!modal.handle_pointer(PointerTarget::Panel(Panel::Sub), &mut surface));
        assert!(modal.is_open());

        assert!(modal.handle_pointer(PointerTarget::Overlay, &mut surface));
        assert!(!modal.is_open());
        assert!(!surface.scroll_locked);
    }

    #[test]
    fn advance_and_back_switch_panels() {
        let mut surface = FakeSurface::with_panels(&["close", "add"], &["back", "close-sub", "title"]);
        let mut modal = ModalController::default();
        modal.open(gallery_modal(), &mut surface);

        modal.activate(ModalControl::Advance, &mut surface).unwrap();
        assert_eq!(modal.visible_panel(), Some(Panel::Sub));
        assert!(surface.visible(Panel::Sub) && !surface.visible(Panel::Main));
        assert_eq!(surface.focused(), Some("back"));

        modal.activate(ModalControl::Back, &mut surface).unwrap();
        assert_eq!(modal.visible_panel(), Some(Panel::Main));
        assert!(surface.visible(Panel::Main) && !surface.visible(Panel::Sub));
    }

    // Each panel restores its own last focused element after a round trip.
    #[test]
    fn panels_keep_independent_focus() {
        let mut surface = FakeSurface::with_panels(&["close", "delete-1", "add"], &["back", "title"]);
        let mut modal = ModalController::default();
        modal.open(gallery_modal(), &mut surface);

        surface.focused = Some("add".into());
        modal.show_sub(&mut surface).unwrap();
        assert_eq!(surface.focused(), Some("back"));
        surface.focused = Some("title".into());

        modal.show_main(&mut surface).unwrap();
        assert_eq!(surface.focused(), Some("add"));

        modal.show_sub(&mut surface).unwrap();
        assert_eq!(surface.focused(), Some("title"));
    }

    // A remembered element that is now disabled falls back to the first one.
    #[test]
    fn remembered_focus_skips_disabled_elements() {
        let mut surface = FakeSurface::with_panels(&["close"], &["back", "submit"]);
        let mut modal = ModalController::default();
        modal.open(gallery_modal(), &mut surface);
        modal.show_sub(&mut surface).unwrap();
        surface.focused = Some("submit".into());
        modal.show_main(&mut surface).unwrap();

        surface.set_enabled(Panel::Sub, "submit", false);
        modal.show_sub(&mut surface).unwrap();

        assert_eq!(surface.focused(), Some("back"));
    }

    #[test]
    fn misuse_is_reported_as_errors() {
        let mut surface = FakeSurface::default();
        let mut modal = ModalController::default();

        assert_eq!(modal.show_sub(&mut surface), Err(ModalError::NotOpen));
        assert_eq!(
            modal.activate(ModalControl::Close, &mut surface),
            Err(ModalError::NotOpen)
        );

        modal.open(ModalContent::new("401"), &mut surface);
        assert_eq!(
            modal.show_sub(&mut surface),
            Err(ModalError::NoSubPanel("401".into()))
        );
        assert_eq!(modal.visible_panel(), Some(Panel::Main));
    }

    #[test]
    fn opening_again_replaces_current_modal() {
        let mut surface = FakeSurface::with_panels(&["close"], &[]);
        let mut modal = ModalController::default();
        modal.open(ModalContent::new("401"), &mut surface);

        modal.open(gallery_modal(), &mut surface);

        assert_eq!(modal.modal_id(), Some("galerie-photo"));
        assert_eq!(surface.mounted.as_deref(), Some("galerie-photo"));
        assert!(surface.scroll_locked);
    }
}
