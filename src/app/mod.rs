// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application entry point wiring logging and egui/eframe to launch the Vario bot UI.

use eframe::egui;
use egui_phosphor::Variant;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::ui::VariobotApp;

/// Bootstrap the desktop application and run the main egui event loop.
///
/// The single optional launch argument is a link carrying `?payload=` (or the raw
/// encoded payload itself); it is decoded as if it had been pasted.
pub fn run() -> eframe::Result<()> {
    init_tracing();

    let settings = Settings::default();
    let launch_link = std::env::args().nth(1);
    tracing::info!(
        webhook = %settings.webhook_url,
        launch_link = launch_link.is_some(),
        "starting Vario bot"
    );

    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 760.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let window_title = settings.window_title.clone();
    eframe::run_native(
        &window_title,
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(VariobotApp::new(settings, launch_link)))
        }),
    )
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
