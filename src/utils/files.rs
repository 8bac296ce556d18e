// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! File helpers for image uploads: MIME detection, preview decoding, size labels.

use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui;

/// Largest edge of a decoded preview, in pixels.
const PREVIEW_MAX: u32 = 256;

/// Guess a MIME essence string from the file extension.
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Load and resize an image to a preview-friendly `ColorImage`.
///
/// # Errors
///
/// Returns an error when the file cannot be read or decoded.
pub fn load_image_preview(path: &Path) -> Result<egui::ColorImage> {
    let dyn_img =
        image::open(path).with_context(|| format!("Failed to decode image: {:?}", path))?;
    let resized = dyn_img.thumbnail(PREVIEW_MAX, PREVIEW_MAX).to_rgba8();
    let size = [resized.width() as usize, resized.height() as usize];
    let pixels = resized.into_raw();
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, &pixels))
}

/// Human-readable formatting for byte sizes with binary units.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
