use eframe::egui;
use tracing::{info, warn};

use crate::engine::protocol::EngineCommand;
use crate::model::player::PlayerId;

use super::app::JudgeApp;
use super::settings_io::{save_gateway_config, save_settings};

pub fn draw_settings_window(ctx: &egui::Context, app: &mut JudgeApp) {
    if !app.ui.show_settings {
        return;
    }

    let mut open = true;
    egui::Window::new("⚙ Settings")
        .open(&mut open)
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.heading("Display");
            ui.add(egui::Slider::new(&mut app.settings.ui_scale, 0.75..=2.0).text("UI scale"));
            ui.checkbox(&mut app.settings.instant_playback, "Show dialogue instantly");

            for player in [PlayerId::One, PlayerId::Two] {
                ui.horizontal(|ui| {
                    let mut color = app.settings.color(player.color_key());
                    if ui.color_edit_button_srgba(&mut color).changed() {
                        app.settings.set_color(player.color_key(), color);
                    }
                    ui.label(format!("Player {} colour", player.number()));
                });
            }

            ui.separator();
            ui.heading("Judge model");

            let draft = &mut app.ui.gateway_draft;
            egui::Grid::new("gateway_grid").num_columns(2).show(ui, |ui| {
                ui.label("Base URL");
                ui.text_edit_singleline(&mut draft.base_url);
                ui.end_row();

                ui.label("Model");
                ui.text_edit_singleline(&mut draft.model);
                ui.end_row();

                ui.label("Battle temperature");
                ui.add(egui::Slider::new(&mut draft.battle_temperature, 0.0..=2.0));
                ui.end_row();

                ui.label("Helper temperature");
                ui.add(egui::Slider::new(&mut draft.suggestion_temperature, 0.0..=2.0));
                ui.end_row();

                ui.label("Timeout (s)");
                ui.add(egui::DragValue::new(&mut draft.timeout_secs).range(5..=600));
                ui.end_row();

                ui.label("API key");
                ui.label(if draft.api_key.is_some() {
                    "set from environment"
                } else {
                    "none"
                });
                ui.end_row();
            });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("💾 Apply & save").clicked() {
                    apply_settings(app);
                }
                if ui.button("🔌 Test connection").clicked() {
                    app.ui.connection_status = Some("Testing...".into());
                    if !app.send_command(EngineCommand::TestConnection) {
                        app.ui.connection_status = Some("Engine is not running".into());
                    }
                }
            });

            if let Some(status) = &app.ui.connection_status {
                ui.label(status);
            }
        });

    if !open {
        app.ui.show_settings = false;
    }
}

fn apply_settings(app: &mut JudgeApp) {
    if let Err(e) = save_settings(&app.settings) {
        warn!(error = %e, "could not save UI settings");
    }
    if let Err(e) = save_gateway_config(&app.ui.gateway_draft) {
        warn!(error = %e, "could not save gateway settings");
    }

    let config = app.ui.gateway_draft.clone();
    info!(base_url = %config.base_url, model = %config.model, "reconfiguring judge");
    app.ui.connection_status = None;
    app.send_command(EngineCommand::Reconfigure(config));
}

/// Asks "are you sure?" before a surrender becomes final.
pub fn draw_surrender_window(ctx: &egui::Context, app: &mut JudgeApp) {
    let Some(player) = app.controller.pending_surrender() else {
        return;
    };
    let name = app.controller.state().nickname(player).to_string();

    egui::Window::new("🏳 Surrender?")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(format!("{name}, do you really give up?"));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Yes, I concede").clicked() {
                    let result = app.controller.confirm_surrender();
                    if app.report(result).is_some() {
                        app.playback = None;
                    }
                }
                if ui.button("No, keep fighting").clicked() {
                    app.controller.cancel_surrender();
                }
            });
        });
}
