// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Produce kebab-case identifiers from display names (modal ids, category ids).

/// Produce a lowercase kebab-case slug.
///
/// # Steps
/// - Transliterate Unicode to ASCII with `deunicode` (e.g., "é" → "e").
/// - Keep ASCII alphanumerics, lowercased; every other run becomes one `-`.
/// - Trim leading/trailing dashes and fall back to `item` when nothing is left.
pub fn slugify(value: &str) -> String {
    let transliterated = deunicode::deunicode(value);
    let mut out = String::with_capacity(transliterated.len());
    let mut pending_dash = false;

    for ch in transliterated.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if out.is_empty() {
        return "item".to_string();
    }
    out
}
