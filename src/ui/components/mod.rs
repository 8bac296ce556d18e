// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Reusable egui components structured for MVU-style updates.

pub mod edit_modal;
pub mod field_label;
pub mod gallery;
pub mod login;
pub mod modal;
pub mod surface;

/// Form-level message shown when a request never got an answer.
pub const CONNECTION_ERROR: &str = "Problème de connexion. Réessayez plus tard.";
