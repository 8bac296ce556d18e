// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

use eframe::egui;

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 40, 40);

/// Field label with the inline validation message appended after it.
pub fn field_label(ui: &mut egui::Ui, text: &str, error: Option<&str>) {
    ui.horizontal(|ui| {
        ui.label(text);
        if let Some(message) = error {
            ui.label(egui::RichText::new(format!("({message})")).color(ERROR_COLOR));
        }
    });
}

/// Form-level error line (e.g. a failed request).
pub fn form_error(ui: &mut egui::Ui, message: Option<&str>) {
    if let Some(message) = message {
        ui.label(egui::RichText::new(message).color(ERROR_COLOR));
    }
}
