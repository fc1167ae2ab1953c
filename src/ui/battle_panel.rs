use std::time::Instant;

use eframe::egui;
use egui::Layout;

use crate::engine::controller::{BattleStatus, ManualArgument};
use crate::model::battle_round::DialogueLine;
use crate::model::game_state::MAX_ROUNDS;
use crate::model::player::PlayerId;

use super::app::{bubble, vote_bar, JudgeApp};
use super::playback::{DialoguePlayback, PlaybackFrame};

pub fn draw_battle_panel(ctx: &egui::Context, app: &mut JudgeApp) {
    let state = app.controller.state();
    let round_index = state.current_round_index;
    let p1 = state.p1.nickname.clone();
    let p2 = state.p2.nickname.clone();
    let topic = state.topic.clone();

    /* ---------- Header ---------- */
    egui::TopBottomPanel::top("battle_header").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.colored_label(app.settings.color(PlayerId::One.color_key()), &p1);
            ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(app.settings.color(PlayerId::Two.color_key()), &p2);
            });
        });
        ui.vertical_centered(|ui| {
            ui.heading(format!("Round {} / {}", (round_index + 1).min(MAX_ROUNDS), MAX_ROUNDS));
            ui.label(&topic);
        });
        ui.horizontal(|ui| {
            if ui.small_button(format!("{p1} gives up")).clicked() {
                let result = app.controller.request_surrender(PlayerId::One);
                app.report(result);
            }
            ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button(format!("{p2} gives up")).clicked() {
                    let result = app.controller.request_surrender(PlayerId::Two);
                    app.report(result);
                }
            });
        });
    });

    /* ---------- Arena ---------- */
    match app.controller.battle_status() {
        BattleStatus::Processing => {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(80.0);
                    ui.spinner();
                    ui.heading(format!("{p1} 🗯 {p2}"));
                    ui.label("Heated negotiations in progress...");
                });
            });
        }
        BattleStatus::AwaitingManual(player) => draw_manual_input(ctx, app, player),
        BattleStatus::RoundComplete => draw_round(ctx, app),
        BattleStatus::Ready | BattleStatus::Exhausted | BattleStatus::NotInBattle => {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(80.0);
                    ui.label("Getting ready to fight...");
                });
            });
        }
    }
}

fn draw_manual_input(ctx: &egui::Context, app: &mut JudgeApp, player: PlayerId) {
    let state = app.controller.state();
    let name = state.nickname(player).to_string();
    let opponent_arg = state
        .player(player.other())
        .argument_for_round(state.current_round_index)
        .unwrap_or_default()
        .to_string();

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading(egui::RichText::new(format!("😲 {name} is out of arguments!")).color(egui::Color32::from_rgb(220, 38, 38)));
            ui.label("Quick! Step in and hit back yourself!");
            ui.add_space(12.0);
            ui.label(egui::RichText::new(format!("The other side says: \"{opponent_arg}\"")).italics());
            ui.add_space(12.0);

            let response = ui.add(
                egui::TextEdit::singleline(&mut app.ui.manual_input)
                    .hint_text("Type your divine comeback...")
                    .desired_width(320.0),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let ready = !app.ui.manual_input.trim().is_empty();
            let clicked = ui
                .add_enabled(ready, egui::Button::new("🗣 Fight back!"))
                .clicked();

            if ready && (clicked || submitted) {
                let text = app.ui.manual_input.clone();
                app.start_round(Some(ManualArgument { player, text }));
            }
        });
    });
}

fn draw_round(ctx: &egui::Context, app: &mut JudgeApp) {
    let round_index = app.controller.state().current_round_index;

    // A judged round without playback (e.g. instant mode turned on mid-round) shows in full.
    if app.playback.as_ref().map(DialoguePlayback::round_index) != Some(round_index) {
        let lines = app
            .controller
            .state()
            .current_round()
            .map(|r| r.dialogue.len())
            .unwrap_or(0);
        app.playback = Some(DialoguePlayback::immediate(round_index, lines));
    }

    let now = Instant::now();
    let frame = app
        .playback
        .as_ref()
        .map(|p| p.frame(now))
        .unwrap_or(PlaybackFrame {
            visible_lines: 0,
            verdict_visible: false,
        });

    let Some(round) = app.controller.state().current_round().cloned() else {
        return;
    };
    let p1 = app.controller.state().p1.nickname.clone();
    let p2 = app.controller.state().p2.nickname.clone();

    if frame.verdict_visible {
        egui::TopBottomPanel::bottom("verdict").show(ctx, |ui| {
            egui::Frame::new()
                .fill(app.settings.color("Verdict"))
                .corner_radius(egui::CornerRadius::same(8))
                .inner_margin(egui::Margin::same(12))
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            egui::RichText::new("⚖ This round ⚖")
                                .size(20.0)
                                .color(egui::Color32::BLACK),
                        );
                    });
                    vote_bar(ui, &app.settings, round.vote_p1);
                    ui.vertical_centered(|ui| {
                        ui.label(
                            egui::RichText::new(format!("\" {} \"", round.reason))
                                .italics()
                                .color(egui::Color32::DARK_GRAY),
                        );
                    });
                });

            ui.add_space(6.0);
            let label = if round_index + 1 < MAX_ROUNDS {
                "👉 Next round"
            } else {
                "🏁 See the final result"
            };
            ui.vertical_centered(|ui| {
                if ui.button(egui::RichText::new(label).size(20.0)).clicked() {
                    app.accept_round();
                }
            });
            ui.add_space(6.0);
        });
    } else {
        egui::TopBottomPanel::bottom("playback_controls").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                if ui.small_button("Skip ⏩").clicked() {
                    if let Some(p) = app.playback.as_mut() {
                        p.skip();
                    }
                }
            });
        });
    }

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for (i, line) in round.dialogue.iter().take(frame.visible_lines).enumerate() {
                    let side = speaker_side(line, i, &p1, &p2);
                    let color = side
                        .map(|p| app.settings.color(p.color_key()))
                        .unwrap_or_else(|| app.settings.color("Narrator"));
                    let text = format!("{}: {}", line.speaker, line.text);

                    ui.add_space(6.0);
                    if side == Some(PlayerId::Two) {
                        ui.with_layout(Layout::right_to_left(egui::Align::TOP), |ui| {
                            bubble(ui, color, &text);
                        });
                    } else {
                        bubble(ui, color, &text);
                    }
                }
            });
    });
}

/// Which side a line is drawn on. Unknown speakers get `None` and the narrator colour.
/// With identical nicknames the speaker is ambiguous, so turns alternate starting with player one.
fn speaker_side(line: &DialogueLine, index: usize, p1: &str, p2: &str) -> Option<PlayerId> {
    let side = line.side(p1, p2)?;
    if p1 != p2 {
        return Some(side);
    }
    Some(if index % 2 == 0 { PlayerId::One } else { PlayerId::Two })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_follow_their_speaker() {
        let line = DialogueLine::new("乙", "不对");
        assert_eq!(speaker_side(&line, 0, "甲", "乙"), Some(PlayerId::Two));
        assert_eq!(
            speaker_side(&DialogueLine::new("路人", "吃瓜"), 1, "甲", "乙"),
            None
        );
    }

    #[test]
    fn shared_nickname_alternates_turns() {
        let line = DialogueLine::new("阿明", "...");
        assert_eq!(speaker_side(&line, 0, "阿明", "阿明"), Some(PlayerId::One));
        assert_eq!(speaker_side(&line, 1, "阿明", "阿明"), Some(PlayerId::Two));
    }
}
