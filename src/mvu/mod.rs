// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring component state, messages, and commands.

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::config::Settings;
use crate::logic::docx::{MIME_TYPE, write_document};
use crate::logic::webhook::Webhook;
use crate::models::inbound::InboundRecord;
use crate::models::submission::ModuleSubmission;
use crate::ui::components::manual_json::{self, ManualJsonCommand, ManualJsonModel, ManualJsonMsg};
use crate::ui::components::module_form::{self, ModuleFormCommand, ModuleFormModel, ModuleFormMsg};
use crate::ui::components::received::{self, ReceivedCommand, ReceivedModel, ReceivedMsg};

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Endpoint, titles, and file names in effect.
    pub settings: Settings,
    /// Module-name submission form.
    pub module_form: ModuleFormModel,
    /// Text received through a link.
    pub received: ReceivedModel,
    /// Manually pasted JSON.
    pub manual: ManualJsonModel,
    /// Most recently written document.
    pub last_saved: Option<PathBuf>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

/// Application messages routed through the update function.
pub enum Msg {
    ModuleForm(ModuleFormMsg),
    Received(ReceivedMsg),
    ManualJson(ManualJsonMsg),
    SaveCompleted(Result<PathBuf, String>),
    OpenSaved,
    OpenCompleted(Result<(), String>),
    DismissError,
}

/// Commands represent side-effects executed between frames.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    SubmitModule {
        url: String,
        timeout: Duration,
        submission: ModuleSubmission,
    },
    SaveDocument(SavePayload),
    OpenDocument(PathBuf),
}

/// Captured data for writing one document.
#[derive(Debug, PartialEq, Eq)]
pub struct SavePayload {
    /// Destination path (with `.docx` extension enforced).
    pub output: PathBuf,
    /// Record to lay out.
    pub record: InboundRecord,
    /// Title used when the record has none.
    pub default_title: String,
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::DismissError => model.error = None,
        Msg::ModuleForm(m) => {
            let mut form_cmds = Vec::new();
            if let Some(event) = module_form::update(&mut model.module_form, m, &mut form_cmds) {
                surface_event(model, event.message, event.is_error);
            }
            for c in form_cmds {
                match c {
                    ModuleFormCommand::Send(submission) => cmds.push(Command::SubmitModule {
                        url: model.settings.webhook_url.clone(),
                        timeout: model.settings.request_timeout,
                        submission,
                    }),
                }
            }
        }
        Msg::Received(m) => {
            let mut received_cmds = Vec::new();
            if let Some(event) = received::update(&mut model.received, m, &mut received_cmds) {
                surface_event(model, event.message, event.is_error);
            }
            for c in received_cmds {
                match c {
                    ReceivedCommand::Save { output, text } => {
                        let title = model.settings.received_title.clone();
                        cmds.push(save_command(&model.settings, output, title, text));
                    }
                }
            }
        }
        Msg::ManualJson(m) => {
            let mut manual_cmds = Vec::new();
            if let Some(event) = manual_json::update(&mut model.manual, m, &mut manual_cmds) {
                surface_event(model, event.message, event.is_error);
            }
            for c in manual_cmds {
                match c {
                    ManualJsonCommand::Save { output, text } => {
                        let title = model.settings.manual_title.clone();
                        cmds.push(save_command(&model.settings, output, title, text));
                    }
                }
            }
        }
        Msg::SaveCompleted(result) => match result {
            Ok(path) => {
                surface_event(model, format!("Dokument uložen: {}", path.display()), false);
                model.last_saved = Some(path);
            }
            Err(err) => surface_event(model, format!("Dokument se nepodařilo uložit:\n\n{err}"), true),
        },
        Msg::OpenSaved => {
            if let Some(path) = &model.last_saved {
                cmds.push(Command::OpenDocument(path.clone()));
            }
        }
        Msg::OpenCompleted(result) => {
            if let Err(err) = result {
                surface_event(model, format!("Dokument se nepodařilo otevřít: {err}"), true);
            }
        }
    }
}

/// Execute a command synchronously and return a resulting message.
pub fn run_command(cmd: Command) -> Msg {
    match cmd {
        Command::SubmitModule {
            url,
            timeout,
            submission,
        } => {
            let result = Webhook::new(url, timeout)
                .and_then(|webhook| webhook.submit(&submission))
                .map(|()| submission)
                .map_err(|err| err.to_string());
            Msg::ModuleForm(ModuleFormMsg::SubmitFinished(result))
        }
        Command::SaveDocument(payload) => {
            let res = write_document(&payload.output, &payload.record, &payload.default_title)
                .map(|()| {
                    info!(path = %payload.output.display(), mime = MIME_TYPE, "document saved");
                    payload.output.clone()
                });
            Msg::SaveCompleted(res.map_err(|e| format!("{e:#}")))
        }
        Command::OpenDocument(path) => {
            Msg::OpenCompleted(open::that(&path).map_err(|err| err.to_string()))
        }
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

/// Wrap extracted text in the single-body record both receiving flows export.
fn save_command(settings: &Settings, output: PathBuf, title: String, text: String) -> Command {
    Command::SaveDocument(SavePayload {
        output,
        record: InboundRecord::with_text(title, text),
        default_title: settings.default_title.clone(),
    })
}
