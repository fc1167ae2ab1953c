mod ui;
mod engine;
mod model;

use tracing_subscriber::EnvFilter;

use engine::gateway::Gateway;
use ui::settings_io::{load_gateway_config, load_settings};

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    setup_logging();

    let settings = load_settings();
    let gateway_config = load_gateway_config();
    let gateway = Gateway::connect(&gateway_config)?;
    tracing::info!(judge = gateway.oracle_name(), "judge ready");

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Judge For Us",
        options,
        Box::new(move |cc| {
            Ok(Box::new(ui::app::JudgeApp::new(cc, settings, gateway_config, gateway)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
