#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use env_logger::Env;

mod components;
mod error;
mod frames;
mod process;
mod structs;
mod types;
mod ui;
mod util;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        centered: true,
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([560.0, 440.0])
            .with_resizable(false)
            .with_maximize_button(false),
        ..Default::default()
    };

    eframe::run_native(
        "Image Format Converter",
        options,
        Box::new(|_cc| Ok(Box::<ui::App>::default())),
    )
}
