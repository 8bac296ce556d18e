// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Form field descriptors and the per-field validation rules (UI-agnostic).

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use thiserror::Error;

use crate::utils::guess_mime;

/// Largest accepted image upload (4 MiB).
pub const MAX_IMAGE_BYTES: u64 = 4 * 1024 * 1024;

/// MIME types accepted for image uploads.
pub const ACCEPTED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// Input inactivity required before an email field is pattern-checked.
pub const EMAIL_DEBOUNCE: Duration = Duration::from_millis(600);

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain part.
static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Stable identity of a field inside one form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for FieldId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Input kind, which selects the type-specific validation rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    File,
    Select,
}

/// File chosen in a file field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub size: u64,
    pub mime: String,
}

impl SelectedFile {
    pub fn new(path: PathBuf, size: u64, mime: impl Into<String>) -> Self {
        Self {
            path,
            size,
            mime: mime.into(),
        }
    }

    /// Stat a file on disk and guess its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error when the file metadata cannot be read.
    pub fn from_path(path: &Path) -> Result<Self> {
        let size = path
            .metadata()
            .with_context(|| format!("Failed to read file metadata: {:?}", path))?
            .len();
        Ok(Self::new(path.to_path_buf(), size, guess_mime(path)))
    }

    /// Display name (file name component).
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Current value of a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(Option<SelectedFile>),
}

impl FieldValue {
    /// True when the value counts as empty (whitespace-only text or no file).
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::File(file) => file.is_none(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&SelectedFile> {
        match self {
            FieldValue::File(file) => file.as_ref(),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<SelectedFile> for FieldValue {
    fn from(value: SelectedFile) -> Self {
        FieldValue::File(Some(value))
    }
}

/// One validated input: identity, kind and current value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub kind: FieldKind,
    pub value: FieldValue,
}

impl FieldDescriptor {
    pub fn new(id: impl Into<String>, kind: FieldKind) -> Self {
        let value = match kind {
            FieldKind::File => FieldValue::File(None),
            FieldKind::Text | FieldKind::Email | FieldKind::Select => {
                FieldValue::Text(String::new())
            }
        };
        Self {
            id: FieldId::new(id),
            kind,
            value,
        }
    }

    pub fn text(id: impl Into<String>) -> Self {
        Self::new(id, FieldKind::Text)
    }

    pub fn email(id: impl Into<String>) -> Self {
        Self::new(id, FieldKind::Email)
    }

    pub fn file(id: impl Into<String>) -> Self {
        Self::new(id, FieldKind::File)
    }

    pub fn select(id: impl Into<String>) -> Self {
        Self::new(id, FieldKind::Select)
    }

    /// Builder-style initial value.
    #[cfg(test)]
    pub fn with_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.value = value.into();
        self
    }
}

/// Reasons a field is invalid, in display priority order.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("ne peut pas être vide")]
    Empty,
    #[error("La taille doit être inférieur à 4 Mo")]
    FileTooLarge,
    #[error("Le format doit être JPEG ou PNG")]
    UnsupportedFileType,
    #[error("Écriture invalide")]
    InvalidEmail,
}

impl FieldError {
    /// Inline message to show next to the label. Empty fields block submission
    /// without showing any text.
    pub fn message(&self) -> Option<String> {
        match self {
            FieldError::Empty => None,
            other => Some(other.to_string()),
        }
    }
}

/// Apply the emptiness check and the kind-specific rule to a field.
///
/// # Examples
///
/// ```ignore
/// let email = FieldDescriptor::email("email").with_value("user@");
/// assert_eq!(validate_field(&email), Err(FieldError::InvalidEmail));
///
/// let empty = FieldDescriptor::text("title");
/// assert_eq!(validate_field(&empty), Err(FieldError::Empty));
/// ```
pub fn validate_field(field: &FieldDescriptor) -> Result<(), FieldError> {
    if field.value.is_blank() {
        return Err(FieldError::Empty);
    }

    match (field.kind, &field.value) {
        (FieldKind::File, FieldValue::File(Some(file))) => validate_image(file),
        // A file field holding text has no file selected.
        (FieldKind::File, _) => Err(FieldError::Empty),
        (FieldKind::Email, FieldValue::Text(text)) if !is_valid_email(text) => {
            Err(FieldError::InvalidEmail)
        }
        _ => Ok(()),
    }
}

/// Check an image upload against the size limit first, then the MIME allow-list.
pub fn validate_image(file: &SelectedFile) -> Result<(), FieldError> {
    if file.size > MAX_IMAGE_BYTES {
        return Err(FieldError::FileTooLarge);
    }
    if !ACCEPTED_IMAGE_TYPES.contains(&file.mime.as_str()) {
        return Err(FieldError::UnsupportedFileType);
    }
    Ok(())
}

/// Accept `local@domain.tld` shaped addresses without whitespace.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn image(size: u64, mime: &str) -> FieldDescriptor {
        FieldDescriptor::file("image").with_value(SelectedFile::new(
            PathBuf::from("photo"),
            size,
            mime,
        ))
    }

    // Blank text counts as empty and carries no visible message.
    #[test]
    fn whitespace_text_is_empty_without_message() {
        let field = FieldDescriptor::text("title").with_value("   ");
        let err = validate_field(&field).unwrap_err();
        assert_eq!(err, FieldError::Empty);
        assert_eq!(err.message(), None);
    }

    #[test]
    fn email_pattern_requires_domain_and_tld() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("sophie.bluel@test.tld"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user example@test.com"));
        assert!(!is_valid_email("User <user@example.com>"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@example."));
    }

    // Anything shaped local@domain.tld passes, even when RFC parsers would object.
    #[test]
    fn email_pattern_is_permissive_about_dots_and_symbols() {
        for address in [
            "first..last@example.com",
            "a.@example.com",
            ".a@example.com",
            "user@example.com.",
            "jean(dupont)@example.fr",
            "user@-example.com",
        ] {
            assert!(is_valid_email(address), "{address} should be accepted");
        }
    }

    // Invalid email values map to the "invalid format" message.
    #[test]
    fn invalid_email_reports_format_message() {
        let field = FieldDescriptor::email("email").with_value("user@");
        let err = validate_field(&field).unwrap_err();
        assert_eq!(err.message().as_deref(), Some("Écriture invalide"));
    }

    // Size is checked before type, so a large GIF reports the size message.
    #[test]
    fn image_rules_follow_priority() {
        let mb = 1024 * 1024;
        assert_eq!(
            validate_field(&image(5 * mb, "image/jpeg")),
            Err(FieldError::FileTooLarge)
        );
        assert_eq!(
            validate_field(&image(2 * mb, "image/gif")),
            Err(FieldError::UnsupportedFileType)
        );
        assert_eq!(
            validate_field(&image(5 * mb, "image/gif")),
            Err(FieldError::FileTooLarge)
        );
        assert_eq!(validate_field(&image(2 * mb, "image/png")), Ok(()));
        assert_eq!(validate_field(&image(MAX_IMAGE_BYTES, "image/jpeg")), Ok(()));
    }

    #[test]
    fn error_messages_match_interface_strings() {
        assert_eq!(
            FieldError::FileTooLarge.message().as_deref(),
            Some("La taille doit être inférieur à 4 Mo")
        );
        assert_eq!(
            FieldError::UnsupportedFileType.message().as_deref(),
            Some("Le format doit être JPEG ou PNG")
        );
    }

    // Missing files and empty selects are blank.
    #[test]
    fn missing_file_and_empty_select_are_blank() {
        assert_eq!(
            validate_field(&FieldDescriptor::file("image")),
            Err(FieldError::Empty)
        );
        assert_eq!(
            validate_field(&FieldDescriptor::select("category")),
            Err(FieldError::Empty)
        );
        assert_eq!(
            validate_field(&FieldDescriptor::select("category").with_value("2")),
            Ok(())
        );
    }

    #[test]
    fn selected_file_from_path_reads_size_and_mime() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("cover.png");
        std::fs::write(&path, [0u8; 32]).unwrap();

        let file = SelectedFile::from_path(&path).expect("metadata readable");

        assert_eq!(file.size, 32);
        assert_eq!(file.mime, "image/png");
        assert_eq!(file.file_name(), "cover.png");
    }
}
