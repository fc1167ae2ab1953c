use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::engine::config::GatewayConfig;
use crate::ui::settings::UiSettings;

const APP_DIR: &str = "judge_for_us";
const UI_SETTINGS_FILE: &str = "ui_settings.json";
const GATEWAY_FILE: &str = "gateway.json";

fn settings_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

fn load_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        // First run: nothing saved yet.
        Err(_) => return T::default(),
    };

    serde_json::from_str(&text).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
        T::default()
    })
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn load_settings() -> UiSettings {
    load_json(&settings_dir().join(UI_SETTINGS_FILE))
}

pub fn save_settings(settings: &UiSettings) -> anyhow::Result<()> {
    save_json(&settings_dir().join(UI_SETTINGS_FILE), settings)
}

/// Gateway settings from disk, with environment overrides applied.
pub fn load_gateway_config() -> GatewayConfig {
    load_json::<GatewayConfig>(&settings_dir().join(GATEWAY_FILE)).with_env_overrides()
}

pub fn save_gateway_config(config: &GatewayConfig) -> anyhow::Result<()> {
    save_json(&settings_dir().join(GATEWAY_FILE), config)
}
