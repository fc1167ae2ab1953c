use eframe::egui;

use crate::model::player::{PlayerId, ToggleOutcome, MAX_STANCE_CHARS, TEAM_CAPACITY};

use super::app::JudgeApp;

pub fn draw_draft_panel(ctx: &egui::Context, app: &mut JudgeApp, player: PlayerId) {
    let color = app.settings.color(player.color_key());
    let nickname = app.controller.state().nickname(player).to_string();

    egui::TopBottomPanel::bottom("draft_actions").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let team_size = app.controller.state().player(player).team.len();
            let confirm = ui.add_enabled(
                team_size > 0,
                egui::Button::new(
                    egui::RichText::new(format!("✨ {nickname}'s team is ready!")).size(20.0),
                ),
            );
            if confirm.clicked() {
                app.confirm_draft(player);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button(format!("{nickname} gives up")).clicked() {
                    let result = app.controller.request_surrender(player);
                    app.report(result);
                }
            });
        });
        ui.add_space(6.0);
    });

    egui::SidePanel::right("draft_team")
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| draw_team(ui, app, player));

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new(&nickname).color(color));
            ui.heading("'s turn to draft");
        });
        ui.label(format!("Topic: {}", app.controller.state().topic));
        ui.separator();

        ui.label("Your core view (20 characters max):");
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut app.ui.stance_input)
                    .char_limit(MAX_STANCE_CHARS)
                    .hint_text("e.g. Tofu pudding must be savoury!")
                    .desired_width(280.0),
            );

            let waiting = app.ui.pending_suggestions.is_some();
            let label = if waiting { "🧠 Thinking..." } else { "🧞 Summon helpers" };
            let can_ask = !waiting && !app.ui.stance_input.trim().is_empty();
            if ui.add_enabled(can_ask, egui::Button::new(label)).clicked() {
                app.request_suggestions();
            }
        });

        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut app.ui.custom_arg_input)
                    .hint_text("...or write your own argument")
                    .desired_width(280.0),
            );
            if ui.button("Add").clicked() {
                app.add_custom_argument(player);
            }
        });

        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            if app.ui.pending_suggestions.is_some() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Racking brains for reasons...");
                });
            } else if app.ui.suggestions.is_empty() {
                ui.add_space(40.0);
                ui.vertical_centered(|ui| {
                    ui.label("💭 State your view and the cloud helpers will show up!");
                });
            }

            draw_suggestion_cards(ui, app, player, color);
        });
    });
}

fn draw_suggestion_cards(
    ui: &mut egui::Ui,
    app: &mut JudgeApp,
    player: PlayerId,
    color: egui::Color32,
) {
    let mut toggled: Option<String> = None;

    ui.horizontal_wrapped(|ui| {
        let team = &app.controller.state().player(player).team;
        for arg in &app.ui.suggestions {
            let selected = team.contains(arg);
            let text = if selected {
                egui::RichText::new(arg).color(egui::Color32::WHITE)
            } else {
                egui::RichText::new(arg)
            };

            let card = egui::Button::new(text)
                .fill(if selected { color } else { ui.visuals().extreme_bg_color })
                .min_size(egui::vec2(120.0, 40.0));

            if ui.add(card).clicked() {
                toggled = Some(arg.clone());
            }
        }
    });

    if let Some(arg) = toggled {
        let result = app.controller.toggle_argument(player, &arg);
        if app.report(result) == Some(ToggleOutcome::Full) {
            app.ui.notice = Some(format!("A team holds at most {TEAM_CAPACITY} arguments."));
        }
    }
}

fn draw_team(ui: &mut egui::Ui, app: &mut JudgeApp, player: PlayerId) {
    let team = app.controller.state().player(player).team.clone();

    ui.heading(format!("Team {}/{} 🚩", team.len(), TEAM_CAPACITY));
    ui.label("Arguments are played in this order.");
    ui.separator();

    let mut removed: Option<String> = None;
    for (i, arg) in team.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(format!("{}. {arg}", i + 1));
            if ui.small_button("❌").clicked() {
                removed = Some(arg.clone());
            }
        });
    }

    if let Some(arg) = removed {
        let result = app.controller.toggle_argument(player, &arg);
        app.report(result);
    }
}
