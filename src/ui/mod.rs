// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for the Vario bot.
//! Handles layout, the submission form, and the receiving/export views.

pub mod components;

use eframe::egui;

use crate::config::Settings;
use crate::mvu::{self, AppModel, Command, Msg};
use crate::ui::components::{manual_json, module_form, received};
use crate::ui::components::received::ReceivedMsg;

/// Stateful egui application for sending module names and exporting results.
pub struct VariobotApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl VariobotApp {
    /// Start the command workers and queue the launch link, if any.
    pub fn new(settings: Settings, launch_link: Option<String>) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().clamp(2, 4))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd);
                    let _ = msg_tx.send(msg);
                }
            });
        }

        let inbox = launch_link
            .map(|link| Msg::Received(ReceivedMsg::Launch(link)))
            .into_iter()
            .collect();

        Self {
            model: AppModel {
                settings,
                ..Default::default()
            },
            inbox,
            cmd_tx,
            msg_rx,
        }
    }
}

impl eframe::App for VariobotApp {
    /// Required by eframe 0.34; rendering is driven from `update`, which eframe
    /// still invokes every frame immediately before `ui`.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    /// Drives a single UI frame: drains worker results, applies queued messages,
    /// dispatches resulting commands, and renders the panels.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_spacing(ctx);

        // Pull messages produced by the command worker.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }

        // Keep polling while workers are busy so results show up without input.
        if self.model.pending_commands > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Generátor (a příjemce) popisků modulů ERP Vario");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.render_theme_controls(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_module_form(ui);
                ui.add_space(12.0);
                ui.separator();
                ui.add_space(8.0);

                self.render_received(ui);

                // Received text replaces the manual fallback until it is closed.
                if !self.model.received.has_text() {
                    ui.add_space(12.0);
                    ui.separator();
                    ui.add_space(8.0);
                    self.render_manual_json(ui);
                }
                ui.add_space(8.0);
            });
        });
    }
}

impl VariobotApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    fn render_theme_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(2.0);
        egui::widgets::global_theme_preference_switch(ui);
    }

    fn render_module_form(&mut self, ui: &mut egui::Ui) {
        let msgs = module_form::view(
            ui,
            &self.model.module_form,
            &self.model.settings.module_options,
        );
        self.inbox.extend(msgs.into_iter().map(Msg::ModuleForm));
    }

    fn render_received(&mut self, ui: &mut egui::Ui) {
        let msgs = received::view(
            ui,
            &self.model.received,
            &self.model.settings.received_file_name,
        );
        self.inbox.extend(msgs.into_iter().map(Msg::Received));
    }

    fn render_manual_json(&mut self, ui: &mut egui::Ui) {
        let msgs = manual_json::view(
            ui,
            &self.model.manual,
            &self.model.settings.manual_file_name,
        );
        self.inbox.extend(msgs.into_iter().map(Msg::ManualJson));
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Chyba")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status message, busy spinner, and the open-document action.
    fn render_status(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(text) = &self.model.status {
                let display = if self.model.pending_commands > 0 {
                    format!("{}  ({} probíhá…)", text, self.model.pending_commands)
                } else {
                    text.to_string()
                };
                ui.label(egui::RichText::new(display).color(egui::Color32::from_gray(68)));
            }
            if self.model.pending_commands > 0 {
                ui.add(egui::Spinner::new().size(14.0)).on_hover_text(format!(
                    "{} úloh běží na pozadí",
                    self.model.pending_commands
                ));
            }
            if self.model.last_saved.is_some() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button(format!(
                            "{} Otevřít dokument",
                            egui_phosphor::regular::FOLDER_OPEN
                        ))
                        .clicked()
                    {
                        self.inbox.push(Msg::OpenSaved);
                    }
                });
            }
        });
    }
}
