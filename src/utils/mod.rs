// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by UI and business logic.

pub mod files;
pub mod slug;

/// Guess a MIME type from a path extension.
pub use files::guess_mime;
/// Produce kebab-case identifiers from display names.
pub use slug::slugify;
/// Decode image previews and format file sizes.
pub use files::{format_bytes, load_image_preview};
