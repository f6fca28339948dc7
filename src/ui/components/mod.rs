// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Reusable egui components structured for MVU-style updates.

pub mod manual_json;
pub mod module_form;
pub mod received;
pub mod text_view;

use std::path::PathBuf;

use crate::logic::docx::ensure_extension;

/// Ask for a DOCX destination via the native save dialog.
pub fn pick_docx_path(suggested_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Uložit DOCX")
        .add_filter("Dokument Word", &["docx"])
        .set_file_name(suggested_name)
        .save_file()
        .map(|path| ensure_extension(path, "docx"))
}
