#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use artflow_canvas::{ArtflowApp, CanvasConfig};

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = CanvasConfig::from_env().unwrap_or_else(|err| {
        log::error!("Falling back to the default canvas config: {err}");
        CanvasConfig::default()
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    let app_creator: eframe::AppCreator<'_> = Box::new(move |cc| {
        let app = ArtflowApp::new(cc, config)?;
        Ok(Box::new(app) as Box<dyn eframe::App>)
    });
    eframe::run_native("ArtFlow Canvas", native_options, app_creator)
}
