// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Manual fallback: paste the automation's JSON and inspect or export it.

use std::path::PathBuf;

use eframe::egui;

use crate::logic::payload::{parse_manual_json, text_from_value};
use crate::logic::render::{Block, render_blocks};
use crate::ui::components::{pick_docx_path, text_view};

/// State of the manual JSON section.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct ManualJsonModel {
    input: String,
    pretty: Option<String>,
    text: Option<String>,
    blocks: Vec<Block>,
}

/// Messages emitted by the manual JSON view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManualJsonMsg {
    InputChanged(String),
    Show,
    SaveTo(PathBuf),
    SaveCancelled,
}

/// Side effects requested by the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManualJsonCommand {
    Save { output: PathBuf, text: String },
}

/// User-facing feedback surfaced to the status bar or error modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManualJsonEvent {
    pub message: String,
    pub is_error: bool,
}

/// Apply a message to the model.
pub fn update(
    model: &mut ManualJsonModel,
    msg: ManualJsonMsg,
    cmds: &mut Vec<ManualJsonCommand>,
) -> Option<ManualJsonEvent> {
    match msg {
        ManualJsonMsg::InputChanged(text) => {
            model.input = text;
            None
        }
        ManualJsonMsg::Show => {
            model.pretty = None;
            model.text = None;
            model.blocks.clear();

            let value = match parse_manual_json(&model.input) {
                Ok(value) => value,
                Err(err) => {
                    return Some(ManualJsonEvent {
                        message: format!("Neplatný JSON: {err}"),
                        is_error: true,
                    });
                }
            };

            model.pretty = serde_json::to_string_pretty(&value).ok();
            match text_from_value(&value) {
                Some(text) => {
                    model.blocks = render_blocks(&text);
                    model.text = Some(text);
                    None
                }
                None => Some(ManualJsonEvent {
                    message: "V JSONu není klíč 'result' ani 'text'.".to_string(),
                    is_error: false,
                }),
            }
        }
        ManualJsonMsg::SaveTo(output) => {
            let text = model.text.clone()?;
            cmds.push(ManualJsonCommand::Save { output, text });
            None
        }
        ManualJsonMsg::SaveCancelled => Some(ManualJsonEvent {
            message: "Uložení zrušeno.".to_string(),
            is_error: false,
        }),
    }
}

/// Render the JSON input, its parsed form, and any extracted text.
pub fn view(ui: &mut egui::Ui, model: &ManualJsonModel, suggested_name: &str) -> Vec<ManualJsonMsg> {
    let mut msgs = Vec::new();

    ui.heading(format!(
        "{} Ruční JSON fallback",
        egui_phosphor::regular::BRACKETS_CURLY
    ));
    ui.label("Vlož JSON, nebo otevři odkaz s ?payload= …");
    ui.add_space(4.0);

    let mut input = model.input.clone();
    if ui
        .add(
            egui::TextEdit::multiline(&mut input)
                .code_editor()
                .desired_rows(8)
                .desired_width(f32::INFINITY)
                .hint_text(r#"{"result": "…"}"#),
        )
        .changed()
    {
        msgs.push(ManualJsonMsg::InputChanged(input));
    }

    if ui.button("Zobraz JSON").clicked() {
        msgs.push(ManualJsonMsg::Show);
    }

    if let Some(pretty) = &model.pretty {
        ui.add_space(6.0);
        egui::CollapsingHeader::new("Načtený JSON")
            .default_open(true)
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut pretty.as_str())
                        .code_editor()
                        .desired_width(f32::INFINITY),
                );
            });
    }

    if model.text.is_some() {
        ui.add_space(6.0);
        text_view::show(ui, "manual_text", &model.blocks);
        ui.add_space(6.0);
        if ui
            .button(format!("{} Stáhnout DOCX", egui_phosphor::regular::DOWNLOAD_SIMPLE))
            .clicked()
        {
            match pick_docx_path(suggested_name) {
                Some(path) => msgs.push(ManualJsonMsg::SaveTo(path)),
                None => msgs.push(ManualJsonMsg::SaveCancelled),
            }
        }
    }

    msgs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(model: &mut ManualJsonModel, input: &str) -> Option<ManualJsonEvent> {
        let mut cmds = Vec::new();
        update(model, ManualJsonMsg::InputChanged(input.into()), &mut cmds);
        update(model, ManualJsonMsg::Show, &mut cmds)
    }

    #[test]
    fn invalid_json_reports_parser_detail() {
        let mut model = ManualJsonModel::default();

        let event = show(&mut model, "{\"result\": ").unwrap();

        assert!(event.is_error);
        assert!(event.message.starts_with("Neplatný JSON: "));
        assert!(event.message.contains("line 1"));
        assert!(model.pretty.as_deref().is_none());
    }

    #[test]
    fn json_with_result_extracts_text() {
        let mut model = ManualJsonModel::default();

        let event = show(&mut model, r##"{"result": "# Mzdy", "text": "ignored"}"##);

        assert!(event.is_none());
        assert_eq!(model.text.as_deref(), Some("# Mzdy"));
        assert!(model.pretty.as_deref().unwrap().contains("\"result\""));
    }

    #[test]
    fn json_without_text_keys_reports_info() {
        let mut model = ManualJsonModel::default();

        let event = show(&mut model, r#"{"foo": "bar"}"#).unwrap();

        assert!(!event.is_error);
        assert!(model.text.as_deref().is_none());
        assert!(model.pretty.as_deref().is_some());
    }

    #[test]
    fn manual_input_is_not_percent_decoded() {
        let mut model = ManualJsonModel::default();

        show(&mut model, r#"{"text": "50%25 a+b"}"#);

        assert_eq!(model.text.as_deref(), Some("50%25 a+b"));
    }

    #[test]
    fn save_queues_command_with_extracted_text() {
        let mut model = ManualJsonModel::default();
        show(&mut model, r#"{"text": "Hello"}"#);
        let mut cmds = Vec::new();

        update(&mut model, ManualJsonMsg::SaveTo("manual.docx".into()), &mut cmds);

        assert_eq!(
            cmds,
            vec![ManualJsonCommand::Save {
                output: "manual.docx".into(),
                text: "Hello".into()
            }]
        );
    }
}
