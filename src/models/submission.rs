// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Outbound module-name record and its validation.

use serde::Serialize;
use thiserror::Error;

/// Failures of the submission flow surfaced to the user.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Blank module name; nothing is sent.
    #[error("Prosím, vyplňte název modulu.")]
    EmptyModuleName,
    /// Network failure or non-2xx response, carrying the underlying cause.
    #[error("{0}")]
    Transport(String),
}

/// Validated record sent to the webhook as `{"module_name": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModuleSubmission {
    module_name: String,
}

impl ModuleSubmission {
    /// Trim the raw input and reject it when nothing remains.
    pub fn new(raw: &str) -> Result<Self, SubmitError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(SubmitError::EmptyModuleName);
        }
        Ok(Self {
            module_name: name.to_string(),
        })
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Pretty JSON shown back to the user after a successful send.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
