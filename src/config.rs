// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Runtime settings passed explicitly into the application model.

use std::time::Duration;

/// Make (Integromat) webhook that triggers the description automation.
pub const WEBHOOK_URL: &str = "https://hook.eu2.make.com/6dobqwk57qdm23w6p09pgvnmrrl9qp72";

/// Upper bound for the single webhook POST.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// ERP Vario modules offered in the picker.
pub const MODULE_OPTIONS: [&str; 11] = [
    "Adresář",
    "Banka",
    "Bilanční přehledy",
    "CRM",
    "Majetek",
    "Mzdy",
    "Přijaté doklady",
    "Servis",
    "Skladové hospodářství",
    "Výroba",
    "Vydané doklady",
];

/// Settings shared by the UI and the command workers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Target of the module-name POST.
    pub webhook_url: String,
    /// Timeout applied to the webhook request.
    pub request_timeout: Duration,
    /// Modules listed in the picker.
    pub module_options: Vec<String>,
    /// Heading used when a record carries no `module` key.
    pub default_title: String,
    /// Heading for documents built from text received via a link.
    pub received_title: String,
    /// Heading for documents built from manually pasted JSON.
    pub manual_title: String,
    /// Suggested file name for documents built from a link.
    pub received_file_name: String,
    /// Suggested file name for documents built from pasted JSON.
    pub manual_file_name: String,
    /// Native window title.
    pub window_title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            webhook_url: WEBHOOK_URL.to_string(),
            request_timeout: REQUEST_TIMEOUT,
            module_options: MODULE_OPTIONS.iter().map(|m| m.to_string()).collect(),
            default_title: "Vario modul".into(),
            received_title: "Výstup z Make".into(),
            manual_title: "Ruční JSON".into(),
            received_file_name: "landing_page.docx".into(),
            manual_file_name: "landing_manual.docx".into(),
            window_title: "Vario Bot – Landing-page generátor".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_production_webhook() {
        let settings = Settings::default();

        assert_eq!(settings.webhook_url, WEBHOOK_URL);
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.module_options.len(), MODULE_OPTIONS.len());
        assert_eq!(settings.module_options[0], "Adresář");
    }

    #[test]
    fn suggested_file_names_are_docx() {
        let settings = Settings::default();

        assert!(settings.received_file_name.ends_with(".docx"));
        assert!(settings.manual_file_name.ends_with(".docx"));
    }
}
