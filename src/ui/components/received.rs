// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Automatic receiving path: text delivered through a `?payload=` link.

use std::path::PathBuf;

use eframe::egui;
use tracing::{debug, info};

use crate::logic::payload::{extract_text, payload_from_link};
use crate::logic::render::{Block, render_blocks};
use crate::ui::components::{pick_docx_path, text_view};

/// State of the received-text view.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct ReceivedModel {
    link_input: String,
    text: Option<String>,
    blocks: Vec<Block>,
}

/// Messages emitted by the view or by application start-up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceivedMsg {
    LinkInputChanged(String),
    /// User asked to open the pasted link.
    OpenLink,
    /// Link handed over on launch; failures stay silent.
    Launch(String),
    Clear,
    SaveTo(PathBuf),
    SaveCancelled,
}

/// Side effects requested by the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceivedCommand {
    Save { output: PathBuf, text: String },
}

/// User-facing feedback surfaced to the status bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivedEvent {
    pub message: String,
    pub is_error: bool,
}

impl ReceivedModel {
    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }
}

/// Apply a message to the model.
pub fn update(
    model: &mut ReceivedModel,
    msg: ReceivedMsg,
    cmds: &mut Vec<ReceivedCommand>,
) -> Option<ReceivedEvent> {
    match msg {
        ReceivedMsg::LinkInputChanged(text) => {
            model.link_input = text;
            None
        }
        ReceivedMsg::OpenLink => {
            let link = std::mem::take(&mut model.link_input);
            if accept(model, &link) {
                Some(accepted_event())
            } else {
                model.link_input = link;
                Some(ReceivedEvent {
                    message: "V odkazu není žádný text k zobrazení.".to_string(),
                    is_error: false,
                })
            }
        }
        ReceivedMsg::Launch(link) => accept(model, &link).then(accepted_event),
        ReceivedMsg::Clear => {
            model.text = None;
            model.blocks.clear();
            None
        }
        ReceivedMsg::SaveTo(output) => {
            let text = model.text.clone()?;
            cmds.push(ReceivedCommand::Save { output, text });
            None
        }
        ReceivedMsg::SaveCancelled => Some(ReceivedEvent {
            message: "Uložení zrušeno.".to_string(),
            is_error: false,
        }),
    }
}

/// Decode the link and keep its text; returns whether any text was found.
fn accept(model: &mut ReceivedModel, link: &str) -> bool {
    let raw = payload_from_link(link);
    match extract_text(raw.as_deref()) {
        Some(text) => {
            info!(chars = text.chars().count(), "text received from automation link");
            model.blocks = render_blocks(&text);
            model.text = Some(text);
            true
        }
        None => {
            debug!("link carried no displayable text");
            false
        }
    }
}

fn accepted_event() -> ReceivedEvent {
    ReceivedEvent {
        message: "Text přijat z Make webhooku.".to_string(),
        is_error: false,
    }
}

/// Render the link box and, when present, the received text with its export action.
pub fn view(ui: &mut egui::Ui, model: &ReceivedModel, suggested_name: &str) -> Vec<ReceivedMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        ui.label(format!("{} Odkaz z Make", egui_phosphor::regular::LINK));
        let mut link = model.link_input.clone();
        let resp = ui.add(
            egui::TextEdit::singleline(&mut link)
                .hint_text("https://…?payload=…")
                .desired_width(ui.available_width() - 90.0),
        );
        if resp.changed() {
            msgs.push(ReceivedMsg::LinkInputChanged(link));
        }
        let enter = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Otevřít").clicked() || enter {
            msgs.push(ReceivedMsg::OpenLink);
        }
    });

    if !model.has_text() {
        return msgs;
    }

    ui.add_space(8.0);
    ui.label(
        egui::RichText::new(format!(
            "{} Text přijat z Make webhooku",
            egui_phosphor::regular::CHECK_CIRCLE
        ))
        .color(egui::Color32::from_rgb(46, 125, 50)),
    );
    ui.heading(format!("{} Výstupní text", egui_phosphor::regular::FILE_TEXT));
    text_view::show(ui, "received_text", &model.blocks);

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        if ui
            .button(format!("{} Stáhnout DOCX", egui_phosphor::regular::DOWNLOAD_SIMPLE))
            .clicked()
        {
            match pick_docx_path(suggested_name) {
                Some(path) => msgs.push(ReceivedMsg::SaveTo(path)),
                None => msgs.push(ReceivedMsg::SaveCancelled),
            }
        }
        if ui
            .button(format!("{} Zavřít text", egui_phosphor::regular::X))
            .on_hover_text("Skryje přijatý text a zobrazí ruční JSON fallback")
            .clicked()
        {
            msgs.push(ReceivedMsg::Clear);
        }
    });

    msgs
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = "https://vario-bot.example/?payload=%257B%2522result%2522%253A%2522**Sklad**%2522%257D";

    #[test]
    fn launch_link_with_text_is_accepted() {
        let mut model = ReceivedModel::default();
        let mut cmds = Vec::new();

        let event = update(&mut model, ReceivedMsg::Launch(LINK.into()), &mut cmds);

        assert!(event.is_some());
        assert_eq!(model.text.as_deref(), Some("**Sklad**"));
        assert!(!model.blocks.is_empty());
    }

    #[test]
    fn malformed_launch_link_degrades_silently() {
        let mut model = ReceivedModel::default();
        let mut cmds = Vec::new();

        let event = update(
            &mut model,
            ReceivedMsg::Launch("https://vario-bot.example/?payload=not+json".into()),
            &mut cmds,
        );

        assert!(event.is_none());
        assert!(!model.has_text());
    }

    #[test]
    fn pasted_link_without_text_reports_info_and_keeps_input() {
        let mut model = ReceivedModel::default();
        let mut cmds = Vec::new();
        update(
            &mut model,
            ReceivedMsg::LinkInputChanged("https://vario-bot.example/".into()),
            &mut cmds,
        );

        let event = update(&mut model, ReceivedMsg::OpenLink, &mut cmds).unwrap();

        assert!(!event.is_error);
        assert_eq!(model.link_input, "https://vario-bot.example/");
    }

    #[test]
    fn save_requires_text() {
        let mut model = ReceivedModel::default();
        let mut cmds = Vec::new();

        update(&mut model, ReceivedMsg::SaveTo("out.docx".into()), &mut cmds);
        assert!(cmds.is_empty());

        update(&mut model, ReceivedMsg::Launch(LINK.into()), &mut cmds);
        update(&mut model, ReceivedMsg::SaveTo("out.docx".into()), &mut cmds);
        assert_eq!(
            cmds,
            vec![ReceivedCommand::Save {
                output: "out.docx".into(),
                text: "**Sklad**".into()
            }]
        );
    }

    #[test]
    fn clear_drops_received_text() {
        let mut model = ReceivedModel::default();
        let mut cmds = Vec::new();
        update(&mut model, ReceivedMsg::Launch(LINK.into()), &mut cmds);

        update(&mut model, ReceivedMsg::Clear, &mut cmds);

        assert!(!model.has_text());
        assert!(model.blocks.is_empty());
    }
}
