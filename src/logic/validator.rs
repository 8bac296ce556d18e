// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Live form validation with per-field validity tracking and submit gating.
//!
//! The validator never touches widgets directly. It reports annotations and the
//! submit state through a [`FormSurface`], and takes timestamps from its caller,
//! so debounced email checks can be driven by a simulated clock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::field::{
    EMAIL_DEBOUNCE, FieldDescriptor, FieldError, FieldId, FieldKind, FieldValue, SelectedFile,
    validate_field,
};

/// Capabilities the validator needs from whatever renders the form.
pub trait FormSurface {
    /// Replace any annotation on `field` with `error`.
    fn set_error(&mut self, field: &FieldId, error: &FieldError);
    /// Remove the annotation on `field`, if any.
    fn clear_error(&mut self, field: &FieldId);
    /// Enable or disable the submit control.
    fn set_submit_enabled(&mut self, enabled: bool);
}

struct TrackedField {
    descriptor: FieldDescriptor,
    valid: bool,
    /// Deadline of the pending debounced check; restarting input replaces it.
    pending: Option<Instant>,
}

/// Validity state for one form. Each form owns its own instance.
pub struct FormValidator {
    fields: HashMap<FieldId, TrackedField>,
    debounce: Duration,
}

impl FormValidator {
    /// Start tracking `fields` and publish the initial submit state.
    ///
    /// Initial flags come from the current values without showing annotations,
    /// so a fresh empty form starts with submit disabled and no error text.
    pub fn attach(fields: Vec<FieldDescriptor>, surface: &mut impl FormSurface) -> Self {
        Self::attach_with_debounce(fields, EMAIL_DEBOUNCE, surface)
    }

    pub fn attach_with_debounce(
        fields: Vec<FieldDescriptor>,
        debounce: Duration,
        surface: &mut impl FormSurface,
    ) -> Self {
        let fields = fields
            .into_iter()
            .map(|descriptor| {
                let valid = validate_field(&descriptor).is_ok();
                (
                    descriptor.id.clone(),
                    TrackedField {
                        descriptor,
                        valid,
                        pending: None,
                    },
                )
            })
            .collect();
        let validator = Self { fields, debounce };
        validator.publish_validity(surface);
        validator
    }

    /// Handle a continuous input event (typing).
    ///
    /// Email fields get their emptiness checked immediately while the pattern
    /// check is deferred until `debounce` passes without further input; the
    /// field blocks submission while the check is pending. Other kinds are
    /// validated right away.
    pub fn on_input(
        &mut self,
        id: &FieldId,
        value: impl Into<FieldValue>,
        now: Instant,
        surface: &mut impl FormSurface,
    ) {
        let debounce = self.debounce;
        let Some(field) = self.fields.get_mut(id) else {
            log::warn!("Input for untracked field '{id}' ignored");
            return;
        };
        field.descriptor.value = value.into();

        if field.descriptor.kind == FieldKind::Email {
            field.pending = None;
            field.valid = false;
            if field.descriptor.value.is_blank() {
                surface.set_error(id, &FieldError::Empty);
            } else {
                field.pending = Some(now + debounce);
            }
            self.publish_validity(surface);
            return;
        }

        Self::revalidate(field, surface);
        self.publish_validity(surface);
    }

    /// Handle a discrete change event (file picked, option selected, field left).
    ///
    /// Cancels any pending debounced check and validates immediately.
    pub fn on_change(
        &mut self,
        id: &FieldId,
        value: impl Into<FieldValue>,
        surface: &mut impl FormSurface,
    ) {
        let Some(field) = self.fields.get_mut(id) else {
            log::warn!("Change for untracked field '{id}' ignored");
            return;
        };
        field.descriptor.value = value.into();
        field.pending = None;
        Self::revalidate(field, surface);
        self.publish_validity(surface);
    }

    /// Run every debounced check whose deadline has passed. Returns true when
    /// at least one field was re-validated.
    pub fn poll(&mut self, now: Instant, surface: &mut impl FormSurface) -> bool {
        let mut fired = false;
        for field in self.fields.values_mut() {
            if field.pending.is_some_and(|deadline| deadline <= now) {
                field.pending = None;
                Self::revalidate(field, surface);
                fired = true;
            }
        }
        if fired {
            self.publish_validity(surface);
        }
        fired
    }

    /// Earliest pending debounce deadline, for scheduling the next poll.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.fields.values().filter_map(|f| f.pending).min()
    }

    pub fn has_pending(&self) -> bool {
        self.fields.values().any(|f| f.pending.is_some())
    }

    /// Logical AND over all tracked validity flags.
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(|f| f.valid)
    }

    pub fn field_valid(&self, id: &FieldId) -> Option<bool> {
        self.fields.get(id).map(|f| f.valid)
    }

    pub fn value(&self, id: &FieldId) -> Option<&FieldValue> {
        self.fields.get(id).map(|f| &f.descriptor.value)
    }

    /// Text value of a field, or an empty string for unknown or file fields.
    pub fn text(&self, id: &FieldId) -> &str {
        self.value(id).and_then(FieldValue::as_text).unwrap_or("")
    }

    pub fn file(&self, id: &FieldId) -> Option<&SelectedFile> {
        self.value(id).and_then(FieldValue::as_file)
    }

    fn revalidate(field: &mut TrackedField, surface: &mut impl FormSurface) {
        match validate_field(&field.descriptor) {
            Ok(()) => {
                field.valid = true;
                surface.clear_error(&field.descriptor.id);
            }
            Err(err) => {
                field.valid = false;
                surface.set_error(&field.descriptor.id, &err);
            }
        }
    }

    fn publish_validity(&self, surface: &mut impl FormSurface) {
        let valid = self.is_valid();
        log::debug!(
            "Form validity: {valid} ({} field(s), {} pending)",
            self.fields.len(),
            self.fields.values().filter(|f| f.pending.is_some()).count()
        );
        surface.set_submit_enabled(valid);
    }
}
