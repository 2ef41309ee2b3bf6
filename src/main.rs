mod app;
mod config;
mod data;
mod error;
mod export;
mod gui;
mod log;
mod session;

use std::path::Path;

use app::LabelerApp;
use config::LabelerConfig;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    ::log::info!(
        "Starting MCS storm labeler v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = match LabelerConfig::load(Path::new(config::CONFIG_FILE)) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("{}; falling back to defaults", e);
            LabelerConfig::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([760.0, 560.0])
            .with_title("MCS Storm Classification"),
        ..Default::default()
    };

    eframe::run_native(
        "MCS Storm Classification",
        options,
        Box::new(|cc| Ok(Box::new(LabelerApp::new(cc, config)))),
    )
}
