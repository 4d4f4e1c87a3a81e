// main.rs
mod app;
mod utils;

use app::App;
use eframe::NativeOptions;

fn main() {
    let native_options = NativeOptions {
        initial_window_size: Some(egui::Vec2::new(780.0, 600.0)),
        resizable: false,
        ..Default::default()
    };
    eframe::run_native(
        "Image Converter & Load File Generator",
        native_options,
        Box::new(|_cc| Box::new(App::default())),
    );
}
