// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Module-name form: pick or type a module and send it to the webhook.

use eframe::egui;
use tracing::warn;

use crate::models::submission::ModuleSubmission;

/// UI model for the submission form, kept free of side effects.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct ModuleFormModel {
    input: String,
    in_flight: bool,
    last_sent: Option<String>,
}

/// Messages emitted by the form view or produced by the webhook worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleFormMsg {
    InputChanged(String),
    OptionPicked(String),
    Submit,
    SubmitFinished(Result<ModuleSubmission, String>),
}

/// Side effects requested by the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleFormCommand {
    Send(ModuleSubmission),
}

/// User-facing feedback surfaced to the status bar or error modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleFormEvent {
    pub message: String,
    pub is_error: bool,
}

impl ModuleFormModel {
    /// Pretty JSON of the last successfully delivered record.
    pub fn last_sent(&self) -> Option<&str> {
        self.last_sent.as_deref()
    }
}

/// Apply a message to the model, queueing at most one send per submit.
pub fn update(
    model: &mut ModuleFormModel,
    msg: ModuleFormMsg,
    cmds: &mut Vec<ModuleFormCommand>,
) -> Option<ModuleFormEvent> {
    match msg {
        ModuleFormMsg::InputChanged(text) | ModuleFormMsg::OptionPicked(text) => {
            model.input = text;
            None
        }
        ModuleFormMsg::Submit => {
            if model.in_flight {
                return None;
            }
            match ModuleSubmission::new(&model.input) {
                Ok(submission) => {
                    let message = format!("Odesílám „{}“ do Make…", submission.module_name());
                    model.input.clear();
                    model.last_sent = None;
                    model.in_flight = true;
                    cmds.push(ModuleFormCommand::Send(submission));
                    Some(ModuleFormEvent {
                        message,
                        is_error: false,
                    })
                }
                Err(err) => {
                    warn!(%err, "module name rejected");
                    Some(ModuleFormEvent {
                        message: err.to_string(),
                        is_error: false,
                    })
                }
            }
        }
        ModuleFormMsg::SubmitFinished(result) => {
            model.in_flight = false;
            match result {
                Ok(submission) => {
                    model.last_sent = Some(submission.to_pretty_json());
                    Some(ModuleFormEvent {
                        message: "Název modulu byl odeslán do Make.".to_string(),
                        is_error: false,
                    })
                }
                Err(err) => Some(ModuleFormEvent {
                    message: format!("Nepodařilo se odeslat: {err}"),
                    is_error: true,
                }),
            }
        }
    }
}

/// Render the form and return any messages triggered by user interaction.
pub fn view(ui: &mut egui::Ui, model: &ModuleFormModel, options: &[String]) -> Vec<ModuleFormMsg> {
    let mut msgs = Vec::new();

    ui.heading(format!(
        "{} Vyber modul a odešli do Make",
        egui_phosphor::regular::PAPER_PLANE_TILT
    ));
    ui.label(
        egui::RichText::new(
            "Název modulu se předá do Make skrze připravený webhook, který spustí automatizaci pro vygenerování popisku.",
        )
        .small()
        .color(egui::Color32::from_gray(110)),
    );
    ui.add_space(6.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        egui::Grid::new("module_form_grid")
            .num_columns(2)
            .spacing(egui::vec2(8.0, 10.0))
            .min_col_width(120.0)
            .show(ui, |ui| {
                ui.label("Modul");
                egui::ComboBox::from_id_salt("module_picker")
                    .width(260.0)
                    .selected_text(if model.input.is_empty() {
                        "Vyberte modul…"
                    } else {
                        model.input.as_str()
                    })
                    .show_ui(ui, |ui| {
                        for option in options {
                            if ui
                                .selectable_label(model.input == *option, option.as_str())
                                .clicked()
                            {
                                msgs.push(ModuleFormMsg::OptionPicked(option.clone()));
                            }
                        }
                    });
                ui.end_row();

                ui.label("Název modulu");
                let mut input = model.input.clone();
                let resp = ui.add(
                    egui::TextEdit::singleline(&mut input)
                        .hint_text("Např. Skladové hospodářství")
                        .desired_width(260.0),
                );
                if resp.changed() {
                    msgs.push(ModuleFormMsg::InputChanged(input));
                }
                if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    msgs.push(ModuleFormMsg::Submit);
                }
                ui.end_row();
            });

        ui.add_space(6.0);
        let button = egui::Button::new(format!(
            "{} Odeslat do Make",
            egui_phosphor::regular::PAPER_PLANE_RIGHT
        ));
        if ui
            .add_enabled(!model.in_flight, button)
            .on_disabled_hover_text("Čekám na odpověď webhooku")
            .clicked()
        {
            msgs.push(ModuleFormMsg::Submit);
        }
    });

    if let Some(mut sent) = model.last_sent() {
        ui.add_space(6.0);
        ui.label("Odeslaná data");
        ui.add(
            egui::TextEdit::multiline(&mut sent)
                .code_editor()
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );
    }

    msgs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(model: &mut ModuleFormModel) -> (Option<ModuleFormEvent>, Vec<ModuleFormCommand>) {
        let mut cmds = Vec::new();
        let event = update(model, ModuleFormMsg::Submit, &mut cmds);
        (event, cmds)
    }

    #[test]
    fn submit_with_name_queues_one_send_and_clears_input() {
        let mut model = ModuleFormModel::default();
        let mut cmds = Vec::new();
        update(&mut model, ModuleFormMsg::InputChanged("  Servis ".into()), &mut cmds);

        let (event, cmds) = submit(&mut model);

        assert_eq!(
            cmds,
            vec![ModuleFormCommand::Send(ModuleSubmission::new("Servis").unwrap())]
        );
        assert!(!event.unwrap().is_error);
        assert!(model.input.is_empty());
        assert!(model.in_flight);
    }

    #[test]
    fn blank_name_warns_without_sending() {
        let mut model = ModuleFormModel::default();
        let mut cmds = Vec::new();
        update(&mut model, ModuleFormMsg::InputChanged("   ".into()), &mut cmds);

        let (event, cmds) = submit(&mut model);

        assert!(cmds.is_empty());
        let event = event.unwrap();
        assert!(!event.is_error);
        assert_eq!(event.message, "Prosím, vyplňte název modulu.");
        assert!(!model.in_flight);
    }

    #[test]
    fn submit_is_ignored_while_waiting_for_answer() {
        let mut model = ModuleFormModel::default();
        let mut cmds = Vec::new();
        update(&mut model, ModuleFormMsg::OptionPicked("Banka".into()), &mut cmds);
        submit(&mut model);
        update(&mut model, ModuleFormMsg::InputChanged("Mzdy".into()), &mut cmds);

        let (event, cmds) = submit(&mut model);

        assert!(event.is_none());
        assert!(cmds.is_empty());
    }

    #[test]
    fn successful_finish_records_sent_json() {
        let mut model = ModuleFormModel::default();
        let mut cmds = Vec::new();
        let sent = ModuleSubmission::new("Výroba").unwrap();

        let event = update(
            &mut model,
            ModuleFormMsg::SubmitFinished(Ok(sent)),
            &mut cmds,
        )
        .unwrap();

        assert!(!event.is_error);
        assert!(model.last_sent().unwrap().contains("\"module_name\": \"Výroba\""));
    }

    #[test]
    fn failed_finish_surfaces_cause() {
        let mut model = ModuleFormModel::default();
        let mut cmds = Vec::new();

        let event = update(
            &mut model,
            ModuleFormMsg::SubmitFinished(Err("connection refused".into())),
            &mut cmds,
        )
        .unwrap();

        assert!(event.is_error);
        assert!(event.message.contains("connection refused"));
        assert!(model.last_sent().is_none());
    }
}
