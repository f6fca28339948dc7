// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Read-only rendering of display blocks.

use eframe::egui;

use crate::logic::render::{Block, Span, plain_text};

/// Draw rendered blocks inside a framed, scrollable area.
pub fn show(ui: &mut egui::Ui, id_salt: &str, blocks: &[Block]) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .small_button(format!("{} Kopírovat", egui_phosphor::regular::COPY))
                    .on_hover_text("Zkopíruje text bez formátování")
                    .clicked()
                {
                    ui.ctx().copy_text(plain_text(blocks));
                }
            });
        });
        egui::ScrollArea::vertical()
            .id_salt(id_salt)
            .max_height(360.0)
            .show(ui, |ui| {
                for block in blocks {
                    show_block(ui, block);
                }
            });
    });
}

fn show_block(ui: &mut egui::Ui, block: &Block) {
    match block {
        Block::Heading { level, spans } => {
            let size = match level {
                1 => 22.0,
                2 => 19.0,
                3 => 17.0,
                _ => 15.0,
            };
            ui.add_space(4.0);
            let text: String = spans.iter().map(|s| s.text.as_str()).collect();
            ui.label(egui::RichText::new(text).size(size).strong());
        }
        Block::Paragraph(spans) => show_spans(ui, spans),
        Block::ListItem { depth, spans } => {
            ui.horizontal_wrapped(|ui| {
                ui.add_space(16.0 * (*depth as f32 - 1.0));
                ui.label("•");
                for span in spans {
                    ui.label(rich(span));
                }
            });
        }
        Block::Code(code) => {
            ui.add(
                egui::TextEdit::multiline(&mut code.as_str())
                    .code_editor()
                    .desired_width(f32::INFINITY),
            );
        }
        Block::Rule => {
            ui.separator();
        }
    }
}

fn show_spans(ui: &mut egui::Ui, spans: &[Span]) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for span in spans {
            ui.label(rich(span));
        }
    });
    ui.add_space(4.0);
}

fn rich(span: &Span) -> egui::RichText {
    let mut text = egui::RichText::new(&span.text);
    if span.bold {
        text = text.strong();
    }
    if span.italic {
        text = text.italics();
    }
    if span.code {
        text = text.code();
    }
    text
}
