use eframe::egui;

use crate::model::game_state::MAX_TOPIC_CHARS;
use crate::model::player::{PlayerId, MAX_NICKNAME_CHARS};

use super::app::JudgeApp;

pub fn draw_setup_panel(ctx: &egui::Context, app: &mut JudgeApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.heading("Who is right? Let the crowd decide.");
            ui.add_space(24.0);

            ui.horizontal(|ui| {
                nickname_field(ui, app, PlayerId::One);
                ui.add_space(24.0);
                ui.label(egui::RichText::new("VS").size(32.0).strong());
                ui.add_space(24.0);
                nickname_field(ui, app, PlayerId::Two);
            });

            ui.add_space(24.0);
            ui.label("✍ What are you two arguing about?");
            ui.add(
                egui::TextEdit::singleline(&mut app.ui.topic)
                    .char_limit(MAX_TOPIC_CHARS)
                    .hint_text("Agree on it together (25 characters max)")
                    .desired_width(360.0),
            );

            ui.add_space(24.0);
            if ui
                .add(egui::Button::new(egui::RichText::new("🔥 Start arguing! 🔥").size(22.0)))
                .clicked()
            {
                let (p1, p2, topic) = (
                    app.ui.p1_name.clone(),
                    app.ui.p2_name.clone(),
                    app.ui.topic.clone(),
                );
                let result = app.controller.complete_setup(&p1, &p2, &topic);
                app.report(result);
            }
        });
    });
}

fn nickname_field(ui: &mut egui::Ui, app: &mut JudgeApp, player: PlayerId) {
    let color = app.settings.color(player.color_key());
    let name = match player {
        PlayerId::One => &mut app.ui.p1_name,
        PlayerId::Two => &mut app.ui.p2_name,
    };

    ui.vertical(|ui| {
        ui.colored_label(color, format!("Player {}", player.number()));
        ui.add(
            egui::TextEdit::singleline(name)
                .char_limit(MAX_NICKNAME_CHARS)
                .hint_text(format!("Nickname {}", player.number()))
                .desired_width(140.0),
        );
    });
}
