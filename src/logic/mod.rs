// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! UI-agnostic behaviour: form validation, modal lifecycle, gallery filtering.

pub mod gallery;
pub mod modal;
pub mod validator;
