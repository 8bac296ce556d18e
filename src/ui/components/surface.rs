// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Data-only rendering surfaces for the validator and the modal controller.
//!
//! The engines write into these structs; egui views read them back each frame
//! and report what they rendered through [`FocusFrame`].

use std::collections::HashMap;

use eframe::egui;

use crate::logic::modal::{ElementId, ModalContent, ModalSurface, Panel, Visibility};
use crate::logic::validator::FormSurface;
use crate::models::field::{FieldError, FieldId};

/// Inline annotations and submit state for one form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormAnnotations {
    /// Annotated fields; `None` marks a field that is invalid without visible text.
    errors: HashMap<FieldId, Option<String>>,
    submit_enabled: bool,
    /// Form-level message (e.g. a failed request), shown above the submit control.
    form_error: Option<String>,
}

impl FormAnnotations {
    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    /// Visible message next to the field label, if any.
    pub fn message(&self, field: &FieldId) -> Option<&str> {
        self.errors.get(field).and_then(|m| m.as_deref())
    }

    #[cfg(test)]
    pub fn is_annotated(&self, field: &FieldId) -> bool {
        self.errors.contains_key(field)
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn set_form_error(&mut self, message: impl Into<String>) {
        self.form_error = Some(message.into());
    }

    pub fn clear_form_error(&mut self) {
        self.form_error = None;
    }
}

impl FormSurface for FormAnnotations {
    fn set_error(&mut self, field: &FieldId, error: &FieldError) {
        self.errors.insert(field.clone(), error.message());
    }

    fn clear_error(&mut self, field: &FieldId) {
        self.errors.remove(field);
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }
}

/// What the modal views rendered during one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusFrame {
    /// Enabled interactive elements in render order, tagged with their panel.
    pub elements: Vec<(Panel, ElementId)>,
    /// Element holding keyboard focus this frame.
    pub focused: Option<ElementId>,
    /// Pending focus request that was handed to egui this frame.
    pub applied: Option<ElementId>,
}

/// Mounted modal state as seen by the egui views.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModalView {
    mounted: Option<ModalContent>,
    scroll_locked: bool,
    visibility: HashMap<Panel, Visibility>,
    /// Last rendered focusable list per panel; hidden panels keep their previous list.
    focusable: HashMap<Panel, Vec<ElementId>>,
    focused: Option<ElementId>,
    focus_request: Option<ElementId>,
    /// Panel shown before it was ever rendered; its first element gets focus on render.
    autofocus: Option<Panel>,
}

impl ModalView {
    pub fn mounted(&self) -> Option<&ModalContent> {
        self.mounted.as_ref()
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn is_visible(&self, panel: Panel) -> bool {
        self.visibility.get(&panel) == Some(&Visibility::Visible)
    }

    pub fn focus_request(&self) -> Option<&ElementId> {
        self.focus_request.as_ref()
    }

    pub fn autofocus(&self) -> Option<Panel> {
        self.autofocus
    }

    /// Fold one rendered frame back into the surface.
    pub fn apply_frame(&mut self, frame: FocusFrame) {
        if self.mounted.is_none() {
            return;
        }
        let mut lists: HashMap<Panel, Vec<ElementId>> = HashMap::new();
        for (panel, element) in frame.elements {
            lists.entry(panel).or_default().push(element);
        }
        if let Some(panel) = self.autofocus
            && lists.contains_key(&panel)
        {
            self.autofocus = None;
        }
        self.focusable.extend(lists);

        match frame.applied {
            Some(applied) => {
                if self.focus_request.as_ref() == Some(&applied) {
                    self.focus_request = None;
                }
                self.focused = Some(applied);
            }
            None => self.focused = frame.focused,
        }
    }
}

impl ModalSurface for ModalView {
    fn mount(&mut self, content: &ModalContent) {
        *self = Self {
            mounted: Some(content.clone()),
            ..Self::default()
        };
    }

    fn unmount(&mut self, id: &str) {
        if self.mounted.as_ref().is_some_and(|m| m.id == id) {
            let scroll_locked = self.scroll_locked;
            *self = Self {
                scroll_locked,
                ..Self::default()
            };
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn set_panel_visibility(&mut self, panel: Panel, visibility: Visibility) {
        self.visibility.insert(panel, visibility);
        if visibility == Visibility::Visible && !self.focusable.contains_key(&panel) {
            self.autofocus = Some(panel);
        }
    }

    fn focusable_elements(&self, panel: Panel) -> Vec<ElementId> {
        self.focusable.get(&panel).cloned().unwrap_or_default()
    }

    fn focused_element(&self) -> Option<ElementId> {
        self.focused.clone()
    }

    fn focus(&mut self, element: &ElementId) {
        self.focus_request = Some(element.clone());
        self.focused = Some(element.clone());
        self.autofocus = None;
    }
}

/// Collects a [`FocusFrame`] while modal widgets are rendered.
pub struct FocusTracker<'a> {
    view: &'a ModalView,
    frame: FocusFrame,
}

impl<'a> FocusTracker<'a> {
    pub fn new(view: &'a ModalView) -> Self {
        Self {
            view,
            frame: FocusFrame::default(),
        }
    }

    /// Register an interactive widget of `panel` and apply pending focus to it.
    pub fn track(&mut self, panel: Panel, id: &str, enabled: bool, response: &egui::Response) {
        if !enabled {
            return;
        }
        let requested = self.view.focus_request().is_some_and(|r| r.as_str() == id);
        let first_in_autofocus_panel = self.view.focus_request().is_none()
            && self.view.autofocus() == Some(panel)
            && self.frame.applied.is_none()
            && !self.frame.elements.iter().any(|(p, _)| *p == panel);
        let element = ElementId::new(id);
        if requested || first_in_autofocus_panel {
            response.request_focus();
            self.frame.applied = Some(element.clone());
        }

        if response.has_focus() {
            self.frame.focused = Some(element.clone());
        }
        self.frame.elements.push((panel, element));
    }

    pub fn finish(self) -> FocusFrame {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::modal::ModalController;

    fn frame(elements: &[(Panel, &str)], focused: Option<&str>) -> FocusFrame {
        FocusFrame {
            elements: elements
                .iter()
                .map(|(panel, id)| (*panel, ElementId::from(*id)))
                .collect(),
            focused: focused.map(ElementId::from),
            applied: None,
        }
    }

    // Empty fields are annotated but expose no visible message.
    #[test]
    fn annotations_hide_empty_message() {
        let mut annotations = FormAnnotations::default();
        let id = FieldId::from("email");

        annotations.set_error(&id, &FieldError::Empty);
        assert!(annotations.is_annotated(&id));
        assert_eq!(annotations.message(&id), None);

        annotations.set_error(&id, &FieldError::InvalidEmail);
        assert_eq!(annotations.message(&id), Some("Écriture invalide"));

        annotations.clear_error(&id);
        assert!(!annotations.is_annotated(&id));
    }

    // The first render of a freshly shown panel consumes the autofocus marker.
    #[test]
    fn autofocus_cleared_after_panel_renders() {
        let mut view = ModalView::default();
        let mut modal = ModalController::default();
        modal.open(
            ModalContent::new("Galerie photo").with_sub("Ajout photo"),
            &mut view,
        );
        assert_eq!(view.autofocus(), Some(Panel::Main));
        assert!(view.focus_request().is_none());

        let mut rendered = frame(&[(Panel::Main, "close"), (Panel::Main, "add")], None);
        rendered.applied = Some("close".into());
        view.apply_frame(rendered);

        assert_eq!(view.autofocus(), None);
        assert_eq!(view.focused_element(), Some("close".into()));
        assert_eq!(
            view.focusable_elements(Panel::Main),
            vec![ElementId::from("close"), ElementId::from("add")]
        );
    }

    // Rendered lists feed the controller's focus trap.
    #[test]
    fn rendered_lists_drive_focus_trap() {
        use crate::logic::modal::KeyOutcome;

        let mut view = ModalView::default();
        let mut modal = ModalController::default();
        modal.open(ModalContent::new("401"), &mut view);
        view.apply_frame(frame(
            &[(Panel::Main, "close"), (Panel::Main, "retry")],
            Some("retry"),
        ));

        let outcome = modal.handle_tab(false, &mut view);

        assert_eq!(outcome, KeyOutcome::Prevented);
        assert_eq!(view.focus_request(), Some(&ElementId::from("close")));
    }

    #[test]
    fn close_resets_view_and_unlocks_scroll() {
        let mut view = ModalView::default();
        let mut modal = ModalController::default();
        modal.open(ModalContent::new("401"), &mut view);
        assert!(view.scroll_locked());

        modal.close(&mut view);

        assert!(view.mounted().is_none());
        assert!(!view.scroll_locked());
        assert!(!view.is_visible(Panel::Main));
    }
}
