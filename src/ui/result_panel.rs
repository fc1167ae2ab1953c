use eframe::egui;

use crate::model::player::PlayerId;
use crate::model::verdict::{FinalVerdict, FinalWinner, VerdictBasis};

use super::app::JudgeApp;

pub fn draw_result_panel(ctx: &egui::Context, app: &mut JudgeApp) {
    let Some(verdict) = app.controller.verdict() else {
        return;
    };
    let state = app.controller.state();
    let reason = verdict_reason(
        &verdict,
        state.nickname(PlayerId::One),
        state.nickname(PlayerId::Two),
    );

    let (headline, color) = match verdict.winner_id() {
        Some(winner) => (
            format!("🏆 {} wins!", state.nickname(winner)),
            app.settings.color(winner.color_key()),
        ),
        None => ("🤝 It's a draw!".to_string(), app.settings.color("Narrator")),
    };

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(egui::RichText::new(reason).size(18.0));
            ui.add_space(12.0);

            if verdict.basis == VerdictBasis::Votes {
                ui.label(format!(
                    "Total votes after {} round(s): {} vs {}",
                    verdict.rounds_played, verdict.total_p1_votes, verdict.total_p2_votes
                ));
                ui.add_space(12.0);
            }

            ui.label(egui::RichText::new(headline).size(36.0).strong().color(color));
            ui.add_space(40.0);

            if ui
                .button(egui::RichText::new("🕊 Accept the result, make peace").size(18.0))
                .clicked()
            {
                app.reset();
            }
            ui.add_space(8.0);
            if ui
                .button(egui::RichText::new("😤 Not convinced! Rematch").size(18.0))
                .clicked()
            {
                app.rematch();
            }
        });
    });
}

fn verdict_reason(verdict: &FinalVerdict, p1: &str, p2: &str) -> String {
    let name = |id: PlayerId| match id {
        PlayerId::One => p1,
        PlayerId::Two => p2,
    };

    match (verdict.basis, verdict.winner) {
        (VerdictBasis::Surrender(loser), _) => format!("{} waved the white flag", name(loser)),
        (VerdictBasis::Votes, FinalWinner::Draw) => "The crowd could not pick a side".to_string(),
        (VerdictBasis::Votes, FinalWinner::Player(_)) => "The crowd has spoken".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(winner: FinalWinner, basis: VerdictBasis) -> FinalVerdict {
        FinalVerdict {
            winner,
            basis,
            total_p1_votes: 150,
            total_p2_votes: 150,
            rounds_played: 3,
        }
    }

    #[test]
    fn surrender_names_the_quitter() {
        let v = verdict(
            FinalWinner::Player(PlayerId::One),
            VerdictBasis::Surrender(PlayerId::Two),
        );
        assert_eq!(verdict_reason(&v, "甲", "乙"), "乙 waved the white flag");
    }

    #[test]
    fn equal_totals_read_as_a_draw() {
        let v = verdict(FinalWinner::Draw, VerdictBasis::Votes);
        assert_eq!(verdict_reason(&v, "甲", "乙"), "The crowd could not pick a side");
    }
}
