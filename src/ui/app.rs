use eframe::egui;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::engine::config::GatewayConfig;
use crate::engine::controller::{
    BattleStatus, GameController, ManualArgument, RoundStart, RoundTicket, ValidationError,
};
use crate::engine::engine::Engine;
use crate::engine::gateway::{fallback_outcome, Gateway};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::battle_round::RoundOutcome;
use crate::model::game_state::Phase;
use crate::model::player::{PlayerId, ToggleOutcome, TEAM_CAPACITY};

use super::battle_panel::draw_battle_panel;
use super::draft_panel::draw_draft_panel;
use super::fonts::install_cjk_fallback;
use super::playback::DialoguePlayback;
use super::result_panel::draw_result_panel;
use super::settings::UiSettings;
use super::settings_window::{draw_settings_window, draw_surrender_window};
use super::setup_panel::draw_setup_panel;

const BUSY_REPAINT: Duration = Duration::from_millis(100);

/* =========================
   UI State
   ========================= */

/// Scratch input that is not part of the game state.
#[derive(Default)]
pub(crate) struct UiState {
    pub(crate) p1_name: String,
    pub(crate) p2_name: String,
    pub(crate) topic: String,

    pub(crate) stance_input: String,
    pub(crate) custom_arg_input: String,
    pub(crate) suggestions: Vec<String>,
    /// Id of the suggestion request we are waiting on.
    pub(crate) pending_suggestions: Option<u64>,

    pub(crate) manual_input: String,

    /// Last validation message, shown under the title bar.
    pub(crate) notice: Option<String>,

    pub(crate) show_settings: bool,
    pub(crate) gateway_draft: GatewayConfig,
    pub(crate) connection_status: Option<String>,
}

impl UiState {
    fn clear_draft(&mut self) {
        self.stance_input.clear();
        self.custom_arg_input.clear();
        self.suggestions.clear();
        self.pending_suggestions = None;
    }
}

/* =========================
   App
   ========================= */

pub struct JudgeApp {
    pub(crate) controller: GameController,
    pub(crate) ui: UiState,
    pub(crate) settings: UiSettings,
    pub(crate) playback: Option<DialoguePlayback>,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
    next_request_id: u64,
}

impl JudgeApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: UiSettings,
        gateway_config: GatewayConfig,
        gateway: Gateway,
    ) -> Self {
        install_cjk_fallback(&cc.egui_ctx);

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, gateway);
            engine.run();
        });

        Self {
            controller: GameController::new(),
            ui: UiState {
                gateway_draft: gateway_config,
                ..Default::default()
            },
            settings,
            playback: None,
            cmd_tx,
            resp_rx,
            next_request_id: 0,
        }
    }

    pub(crate) fn send_command(&self, cmd: EngineCommand) -> bool {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("engine thread is gone");
            return false;
        }
        true
    }

    /// Record the outcome of a user action; failures become the on-screen notice.
    pub(crate) fn report<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(v) => {
                self.ui.notice = None;
                Some(v)
            }
            Err(e) => {
                self.ui.notice = Some(e.to_string());
                None
            }
        }
    }

    pub(crate) fn request_suggestions(&mut self) {
        let stance = self.ui.stance_input.trim().to_string();
        if stance.is_empty() || self.ui.pending_suggestions.is_some() {
            return;
        }

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        let sent = self.send_command(EngineCommand::SuggestArguments {
            request_id,
            topic: self.controller.state().topic.clone(),
            stance,
        });
        if sent {
            self.ui.pending_suggestions = Some(request_id);
        }
    }

    /// Add a hand-written argument to the current player's team.
    pub(crate) fn add_custom_argument(&mut self, player: PlayerId) {
        let arg = self.ui.custom_arg_input.trim().to_string();
        if arg.is_empty() {
            return;
        }
        if self.controller.state().player(player).has_argument(&arg) {
            self.ui.custom_arg_input.clear();
            return;
        }

        let result = self.controller.toggle_argument(player, &arg);
        match self.report(result) {
            Some(ToggleOutcome::Full) => {
                self.ui.notice = Some(format!("A team holds at most {TEAM_CAPACITY} arguments."));
            }
            Some(_) => {
                if !self.ui.suggestions.contains(&arg) {
                    self.ui.suggestions.push(arg);
                }
                self.ui.custom_arg_input.clear();
            }
            None => {}
        }
    }

    pub(crate) fn confirm_draft(&mut self, player: PlayerId) {
        let stance = self.ui.stance_input.clone();
        let result = self.controller.confirm_draft(player, &stance);
        if self.report(result).is_some() {
            self.ui.clear_draft();
            if player == PlayerId::One {
                // A rematch keeps each side's stance; offer it back.
                self.ui.stance_input = self.controller.state().p2.main_view.clone();
            }
        }
    }

    pub(crate) fn start_round(&mut self, manual: Option<ManualArgument>) {
        let result = self.controller.begin_round(manual);
        let Some(start) = self.report(result) else {
            return;
        };

        self.playback = None;
        if let RoundStart::Dispatched { ticket, matchup } = start {
            let fallback = fallback_outcome(&matchup);
            if !self.send_command(EngineCommand::SimulateRound { ticket, matchup }) {
                // No engine, no oracle: settle for a tie right away.
                self.on_round_resolved(ticket, fallback);
            }
        }
    }

    fn on_round_resolved(&mut self, ticket: RoundTicket, outcome: RoundOutcome) {
        let Some(round) = self.controller.resolve_round(ticket, outcome) else {
            return;
        };

        let lines = round.dialogue.len();
        self.playback = Some(if self.settings.instant_playback {
            DialoguePlayback::immediate(ticket.round_index, lines)
        } else {
            DialoguePlayback::start(ticket.round_index, lines, Instant::now())
        });
        self.ui.manual_input.clear();
    }

    pub(crate) fn accept_round(&mut self) {
        let result = self.controller.accept_round_result();
        if self.report(result).is_some() {
            self.playback = None;
        }
    }

    pub(crate) fn reset(&mut self) {
        self.controller.reset();
        self.playback = None;
        let gateway_draft = std::mem::take(&mut self.ui.gateway_draft);
        self.ui = UiState {
            gateway_draft,
            ..Default::default()
        };
    }

    pub(crate) fn rematch(&mut self) {
        let result = self.controller.rematch();
        if self.report(result).is_some() {
            self.playback = None;
            self.ui.clear_draft();
            self.ui.manual_input.clear();
            self.ui.stance_input = self.controller.state().p1.main_view.clone();
        }
    }

    fn poll_engine(&mut self) {
        while let Ok(resp) = self.resp_rx.try_recv() {
            match resp {
                EngineResponse::ArgumentsSuggested {
                    request_id,
                    arguments,
                } => {
                    if self.ui.pending_suggestions != Some(request_id) {
                        debug!(request_id, "dropping outdated suggestions");
                        continue;
                    }
                    self.ui.pending_suggestions = None;
                    for arg in arguments {
                        if !self.ui.suggestions.contains(&arg) {
                            self.ui.suggestions.push(arg);
                        }
                    }
                }
                EngineResponse::RoundResolved { ticket, outcome } => {
                    self.on_round_resolved(ticket, outcome);
                }
                EngineResponse::ConnectionStatus(status) => {
                    self.ui.connection_status = Some(match status {
                        Ok(msg) => msg,
                        Err(e) => format!("Connection failed: {e}"),
                    });
                }
            }
        }
    }

    /// Start rounds that need no input, and close out exhausted battles.
    fn drive_battle(&mut self) {
        match self.controller.battle_status() {
            BattleStatus::Ready | BattleStatus::Exhausted => self.start_round(None),
            _ => {}
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context) {
        let busy = self.controller.state().is_battle_processing
            || self.ui.pending_suggestions.is_some();
        let playback_wait = self
            .playback
            .as_ref()
            .and_then(|p| p.next_wakeup(Instant::now()));

        match (busy, playback_wait) {
            (true, Some(d)) => ctx.request_repaint_after(d.min(BUSY_REPAINT)),
            (true, None) => ctx.request_repaint_after(BUSY_REPAINT),
            (false, Some(d)) => ctx.request_repaint_after(d),
            (false, None) => {}
        }
    }
}

/* =========================
   egui App
   ========================= */

impl eframe::App for JudgeApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        self.poll_engine();
        self.drive_battle();

        egui::TopBottomPanel::top("title").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("都来评评理 · Judge For Us");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙ Settings").clicked() {
                        self.ui.show_settings = !self.ui.show_settings;
                    }
                });
            });

            if let Some(notice) = &self.ui.notice {
                ui.colored_label(egui::Color32::from_rgb(200, 40, 40), notice);
            }
        });

        match self.controller.phase() {
            Phase::Setup => draw_setup_panel(ctx, self),
            Phase::P1Draft => draw_draft_panel(ctx, self, PlayerId::One),
            Phase::P2Draft => draw_draft_panel(ctx, self, PlayerId::Two),
            Phase::Battle => draw_battle_panel(ctx, self),
            Phase::Result => draw_result_panel(ctx, self),
        }

        draw_surrender_window(ctx, self);
        draw_settings_window(ctx, self);

        self.schedule_repaint(ctx);
    }
}

/* =========================
   UI Helpers
   ========================= */

pub(crate) fn bubble(ui: &mut egui::Ui, color: egui::Color32, text: &str) {
    egui::Frame::new()
        .fill(color)
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
        });
}

/// Horizontal bar split by player one's share of the votes.
pub(crate) fn vote_bar(ui: &mut egui::Ui, settings: &UiSettings, vote_p1: u8) {
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 28.0), egui::Sense::hover());
    let painter = ui.painter();

    let split = rect.left() + rect.width() * f32::from(vote_p1) / 100.0;
    let left = egui::Rect::from_min_max(rect.min, egui::pos2(split, rect.max.y));
    let right = egui::Rect::from_min_max(egui::pos2(split, rect.min.y), rect.max);

    painter.rect_filled(left, egui::CornerRadius::same(4), settings.color(PlayerId::One.color_key()));
    painter.rect_filled(right, egui::CornerRadius::same(4), settings.color(PlayerId::Two.color_key()));

    let font = egui::FontId::proportional(14.0);
    if vote_p1 > 20 {
        painter.text(
            rect.left_center() + egui::vec2(8.0, 0.0),
            egui::Align2::LEFT_CENTER,
            format!("{vote_p1}"),
            font.clone(),
            egui::Color32::WHITE,
        );
    }
    if vote_p1 < 80 {
        painter.text(
            rect.right_center() - egui::vec2(8.0, 0.0),
            egui::Align2::RIGHT_CENTER,
            format!("{}", 100 - vote_p1),
            font,
            egui::Color32::WHITE,
        );
    }
}
