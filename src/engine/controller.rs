use thiserror::Error;
use tracing::{debug, info};

use crate::model::battle_round::{BattleRound, Matchup, RoundOutcome, OUT_OF_ARGUMENTS};
use crate::model::game_state::{GameState, Phase, MAX_ROUNDS};
use crate::model::player::{PlayerId, ToggleOutcome};
use crate::model::verdict::FinalVerdict;

/// Rejected user actions. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Both nicknames and a topic are required.")]
    MissingSetupFields,
    #[error("Pick at least one argument before confirming.")]
    EmptyTeam,
    #[error("Not allowed during {actual}.")]
    WrongPhase { actual: Phase },
    #[error("A round is already being judged.")]
    RoundInProgress,
    #[error("This round has already been judged.")]
    RoundAlreadyPlayed,
    #[error("The current round has not been judged yet.")]
    RoundNotFinished,
    #[error("No surrender is waiting for confirmation.")]
    NoSurrenderPending,
}

/// Identifies the round a gateway result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTicket {
    pub epoch: u64,
    pub round_index: usize,
}

/// An argument typed in by a player whose prepared pool ran out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualArgument {
    pub player: PlayerId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundStart {
    /// No round to play; the game moved to the result phase.
    Concluded,
    /// Hand this to the gateway and feed the outcome to `resolve_round`.
    Dispatched { ticket: RoundTicket, matchup: Matchup },
}

/// What the battle arena is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleStatus {
    NotInBattle,
    /// Both sides have an argument; start the round without asking.
    Ready,
    /// Exactly one side is out of arguments and has to type one in.
    AwaitingManual(PlayerId),
    /// Neither side has anything left.
    Exhausted,
    Processing,
    /// The current round is judged and shown until accepted.
    RoundComplete,
}

struct PendingRound {
    ticket: RoundTicket,
    matchup: Matchup,
}

/// Owns the game state and is the only thing that changes it.
/// One method per player action; each either applies fully or returns a `ValidationError`.
pub struct GameController {
    state: GameState,
    epoch: u64,
    pending: Option<PendingRound>,
    pending_surrender: Option<PlayerId>,
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

impl GameController {
    pub fn new() -> Self {
        Self {
            state: GameState::default(),
            epoch: 0,
            pending: None,
            pending_surrender: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    fn require_phase(&self, phase: Phase) -> Result<(), ValidationError> {
        if self.state.phase == phase {
            Ok(())
        } else {
            Err(ValidationError::WrongPhase {
                actual: self.state.phase,
            })
        }
    }

    fn enter(&mut self, phase: Phase) {
        info!(from = %self.state.phase, to = %phase, "phase change");
        if phase == Phase::Result {
            // An unanswered surrender request dies with the game.
            self.pending_surrender = None;
        }
        self.state.phase = phase;
    }

    /* =========================
       Setup & draft
       ========================= */

    pub fn complete_setup(
        &mut self,
        p1_name: &str,
        p2_name: &str,
        topic: &str,
    ) -> Result<(), ValidationError> {
        self.require_phase(Phase::Setup)?;

        let (p1_name, p2_name, topic) = (p1_name.trim(), p2_name.trim(), topic.trim());
        if p1_name.is_empty() || p2_name.is_empty() || topic.is_empty() {
            return Err(ValidationError::MissingSetupFields);
        }

        self.state.p1.nickname = p1_name.to_string();
        self.state.p2.nickname = p2_name.to_string();
        self.state.topic = topic.to_string();
        self.enter(Phase::P1Draft);
        Ok(())
    }

    pub fn toggle_argument(
        &mut self,
        player: PlayerId,
        arg: &str,
    ) -> Result<ToggleOutcome, ValidationError> {
        self.require_phase(Phase::draft_of(player))?;

        let outcome = self.state.player_mut(player).toggle_argument(arg);
        debug!(player = player.number(), ?outcome, arg, "toggle argument");
        Ok(outcome)
    }

    pub fn confirm_draft(&mut self, player: PlayerId, stance: &str) -> Result<(), ValidationError> {
        self.require_phase(Phase::draft_of(player))?;

        let p = self.state.player_mut(player);
        if p.team.is_empty() {
            return Err(ValidationError::EmptyTeam);
        }
        p.main_view = stance.trim().to_string();

        let next = match player {
            PlayerId::One => Phase::P2Draft,
            PlayerId::Two => Phase::Battle,
        };
        self.enter(next);
        Ok(())
    }

    /* =========================
       Battle
       ========================= */

    pub fn battle_status(&self) -> BattleStatus {
        let s = &self.state;
        if s.phase != Phase::Battle {
            return BattleStatus::NotInBattle;
        }
        if s.is_battle_processing {
            return BattleStatus::Processing;
        }
        if s.is_current_round_played() {
            return BattleStatus::RoundComplete;
        }
        if s.current_round_index >= MAX_ROUNDS {
            return BattleStatus::Exhausted;
        }

        let idx = s.current_round_index;
        match (
            s.p1.argument_for_round(idx).is_some(),
            s.p2.argument_for_round(idx).is_some(),
        ) {
            (true, true) => BattleStatus::Ready,
            (false, true) => BattleStatus::AwaitingManual(PlayerId::One),
            (true, false) => BattleStatus::AwaitingManual(PlayerId::Two),
            (false, false) => BattleStatus::Exhausted,
        }
    }

    /// Start the round at the current index: pick both sides' arguments and
    /// mark the battle as processing. The gateway call happens elsewhere.
    pub fn begin_round(
        &mut self,
        manual: Option<ManualArgument>,
    ) -> Result<RoundStart, ValidationError> {
        self.require_phase(Phase::Battle)?;
        if self.state.is_battle_processing {
            return Err(ValidationError::RoundInProgress);
        }
        if self.state.is_current_round_played() {
            return Err(ValidationError::RoundAlreadyPlayed);
        }

        let idx = self.state.current_round_index;
        if idx >= MAX_ROUNDS {
            self.enter(Phase::Result);
            return Ok(RoundStart::Concluded);
        }

        let manual = manual.filter(|m| !m.text.trim().is_empty());
        let p1_arg = self.state.p1.argument_for_round(idx).map(str::to_string);
        let p2_arg = self.state.p2.argument_for_round(idx).map(str::to_string);

        if p1_arg.is_none() && p2_arg.is_none() && manual.is_none() {
            info!(round = idx + 1, "both sides are out of arguments");
            self.enter(Phase::Result);
            return Ok(RoundStart::Concluded);
        }

        let (p1_arg, is_p1_manual) = pick_argument(PlayerId::One, p1_arg, manual.as_ref());
        let (p2_arg, is_p2_manual) = pick_argument(PlayerId::Two, p2_arg, manual.as_ref());

        let matchup = Matchup {
            topic: self.state.topic.clone(),
            p1_arg,
            p1_name: self.state.p1.nickname.clone(),
            p2_arg,
            p2_name: self.state.p2.nickname.clone(),
            is_p1_manual,
            is_p2_manual,
        };
        let ticket = RoundTicket {
            epoch: self.epoch,
            round_index: idx,
        };

        self.state.is_battle_processing = true;
        self.pending = Some(PendingRound {
            ticket,
            matchup: matchup.clone(),
        });
        info!(round = idx + 1, is_p1_manual, is_p2_manual, "round dispatched");

        Ok(RoundStart::Dispatched { ticket, matchup })
    }

    /// Fold a gateway outcome into the history.
    /// Returns `None` when the ticket no longer matches the game, e.g. after a reset.
    pub fn resolve_round(
        &mut self,
        ticket: RoundTicket,
        outcome: RoundOutcome,
    ) -> Option<&BattleRound> {
        let matches = self
            .pending
            .as_ref()
            .is_some_and(|p| p.ticket == ticket);
        if !matches || self.state.phase != Phase::Battle {
            debug!(?ticket, epoch = self.epoch, "dropping stale round result");
            return None;
        }
        let pending = self.pending.take()?;

        self.state.is_battle_processing = false;
        if self.state.rounds.len() != ticket.round_index {
            debug!(?ticket, "round already recorded");
            return None;
        }

        let round = BattleRound::new(ticket.round_index + 1, &pending.matchup, outcome);
        self.state.total_p1_votes += u32::from(round.vote_p1);
        self.state.total_p2_votes += u32::from(round.vote_p2());
        info!(
            round = round.round_number,
            vote_p1 = round.vote_p1,
            winner = round.winner.id(),
            "round judged"
        );

        self.state.rounds.push(round);
        self.state.rounds.last()
    }

    pub fn accept_round_result(&mut self) -> Result<(), ValidationError> {
        self.require_phase(Phase::Battle)?;
        if !self.state.is_current_round_played() {
            return Err(ValidationError::RoundNotFinished);
        }

        self.state.current_round_index = self.state.rounds.len();
        if self.state.current_round_index >= MAX_ROUNDS {
            self.enter(Phase::Result);
        }
        Ok(())
    }

    /* =========================
       Surrender, reset, rematch
       ========================= */

    pub fn request_surrender(&mut self, player: PlayerId) -> Result<(), ValidationError> {
        match self.state.phase {
            Phase::P1Draft | Phase::P2Draft | Phase::Battle => {
                self.pending_surrender = Some(player);
                Ok(())
            }
            actual => Err(ValidationError::WrongPhase { actual }),
        }
    }

    pub fn pending_surrender(&self) -> Option<PlayerId> {
        self.pending_surrender
    }

    pub fn cancel_surrender(&mut self) {
        self.pending_surrender = None;
    }

    pub fn confirm_surrender(&mut self) -> Result<PlayerId, ValidationError> {
        if !matches!(
            self.state.phase,
            Phase::P1Draft | Phase::P2Draft | Phase::Battle
        ) {
            return Err(ValidationError::WrongPhase {
                actual: self.state.phase,
            });
        }
        let player = self
            .pending_surrender
            .take()
            .ok_or(ValidationError::NoSurrenderPending)?;

        // Any round still at the gateway belongs to a finished game now.
        self.abandon_pending();
        self.state.surrender_by = Some(player);
        info!(player = player.number(), "surrendered");
        self.enter(Phase::Result);
        Ok(player)
    }

    /// Back to an empty setup screen.
    pub fn reset(&mut self) {
        self.abandon_pending();
        self.pending_surrender = None;
        self.state = GameState::default();
        info!(epoch = self.epoch, "game reset");
    }

    /// Same topic and players, fresh scores.
    pub fn rematch(&mut self) -> Result<(), ValidationError> {
        self.require_phase(Phase::Result)?;

        self.abandon_pending();
        self.pending_surrender = None;
        let s = &mut self.state;
        s.rounds.clear();
        s.current_round_index = 0;
        s.total_p1_votes = 0;
        s.total_p2_votes = 0;
        s.surrender_by = None;
        self.enter(Phase::P1Draft);
        Ok(())
    }

    fn abandon_pending(&mut self) {
        self.epoch += 1;
        self.pending = None;
        self.state.is_battle_processing = false;
    }

    pub fn verdict(&self) -> Option<FinalVerdict> {
        self.state.final_verdict()
    }
}

fn pick_argument(
    side: PlayerId,
    prepared: Option<String>,
    manual: Option<&ManualArgument>,
) -> (String, bool) {
    match (prepared, manual) {
        (Some(arg), _) => (arg, false),
        (None, Some(m)) if m.player == side => (m.text.trim().to_string(), true),
        (None, _) => (OUT_OF_ARGUMENTS.to_string(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::gateway::tests::{gateway, ScriptedOracle};
    use crate::engine::gateway::{Gateway, FALLBACK_REASON};
    use crate::model::battle_round::{DialogueLine, RoundWinner};
    use crate::model::verdict::{FinalWinner, VerdictBasis};

    fn verdict_json(vote: u8) -> String {
        format!(
            r#"{{"dialogue": [{{"speaker": "甲", "text": "..."}}, {{"speaker": "乙", "text": "!!!"}}], "voteP1": {vote}, "reason": "r{vote}"}}"#
        )
    }

    fn outcome(vote: u8) -> RoundOutcome {
        RoundOutcome {
            dialogue: vec![DialogueLine::new("甲", "x")],
            vote_p1: vote,
            reason: "r".into(),
        }
    }

    /// Begin, adjudicate and resolve in one go, the way a headless caller would.
    fn advance_round(
        c: &mut GameController,
        manual: Option<ManualArgument>,
        gateway: &Gateway,
    ) -> Result<Option<BattleRound>, ValidationError> {
        match c.begin_round(manual)? {
            RoundStart::Concluded => Ok(None),
            RoundStart::Dispatched { ticket, matchup } => {
                let outcome = gateway.simulate_battle_round(&matchup);
                Ok(c.resolve_round(ticket, outcome).cloned())
            }
        }
    }

    fn drafted(p1: &[&str], p2: &[&str]) -> GameController {
        let mut c = GameController::new();
        c.complete_setup("甲", "乙", "T").unwrap();
        for a in p1 {
            c.toggle_argument(PlayerId::One, a).unwrap();
        }
        c.confirm_draft(PlayerId::One, "咸的").unwrap();
        for a in p2 {
            c.toggle_argument(PlayerId::Two, a).unwrap();
        }
        c.confirm_draft(PlayerId::Two, "甜的").unwrap();
        c
    }

    fn manual(player: PlayerId, text: &str) -> Option<ManualArgument> {
        Some(ManualArgument {
            player,
            text: text.into(),
        })
    }

    #[test]
    fn setup_requires_all_fields() {
        let mut c = GameController::new();
        assert_eq!(
            c.complete_setup("甲", "  ", "T"),
            Err(ValidationError::MissingSetupFields)
        );
        assert_eq!(c.phase(), Phase::Setup);
        assert!(c.state().p1.nickname.is_empty());

        c.complete_setup(" 甲 ", "乙", "T").unwrap();
        assert_eq!(c.phase(), Phase::P1Draft);
        assert_eq!(c.state().p1.nickname, "甲");
    }

    #[test]
    fn draft_needs_an_argument_and_the_right_player() {
        let mut c = GameController::new();
        c.complete_setup("甲", "乙", "T").unwrap();

        assert_eq!(c.confirm_draft(PlayerId::One, "s"), Err(ValidationError::EmptyTeam));
        assert_eq!(
            c.toggle_argument(PlayerId::Two, "x"),
            Err(ValidationError::WrongPhase {
                actual: Phase::P1Draft
            })
        );

        c.toggle_argument(PlayerId::One, "a1").unwrap();
        c.confirm_draft(PlayerId::One, " 豆腐脑必须是咸的 ").unwrap();
        assert_eq!(c.phase(), Phase::P2Draft);
        assert_eq!(c.state().p1.main_view, "豆腐脑必须是咸的");

        // Player one's team is frozen now.
        assert!(c.toggle_argument(PlayerId::One, "a2").is_err());
    }

    #[test]
    fn ready_round_is_adjudicated_once() {
        let mut c = drafted(&["a1"], &["b1"]);
        assert_eq!(c.battle_status(), BattleStatus::Ready);

        let RoundStart::Dispatched { ticket, matchup } = c.begin_round(None).unwrap() else {
            panic!("expected a dispatched round");
        };
        assert_eq!(matchup.p1_arg, "a1");
        assert_eq!(matchup.p2_arg, "b1");
        assert_eq!(c.battle_status(), BattleStatus::Processing);
        assert_eq!(c.begin_round(None), Err(ValidationError::RoundInProgress));

        let round = c.resolve_round(ticket, outcome(70)).unwrap();
        assert_eq!(round.winner, RoundWinner::Player(PlayerId::One));
        assert_eq!(c.battle_status(), BattleStatus::RoundComplete);

        // A duplicate delivery is ignored.
        assert!(c.resolve_round(ticket, outcome(10)).is_none());
        assert_eq!(c.begin_round(None), Err(ValidationError::RoundAlreadyPlayed));
        assert_eq!(c.state().rounds.len(), 1);
        assert_eq!(c.state().total_p1_votes, 70);
        assert_eq!(c.state().total_p2_votes, 30);
    }

    #[test]
    fn missing_side_gets_manual_text_or_placeholder() {
        let mut c = drafted(&["a1", "a2"], &["b1"]);
        let g = gateway(ScriptedOracle::down());
        advance_round(&mut c, None, &g).unwrap();
        c.accept_round_result().unwrap();

        assert_eq!(c.battle_status(), BattleStatus::AwaitingManual(PlayerId::Two));

        // Text typed for the wrong side is not used.
        let RoundStart::Dispatched { ticket, matchup } =
            c.begin_round(manual(PlayerId::One, "nope")).unwrap()
        else {
            panic!("expected a dispatched round");
        };
        assert_eq!(matchup.p1_arg, "a2");
        assert_eq!(matchup.p2_arg, OUT_OF_ARGUMENTS);
        assert!(!matchup.is_p2_manual);
        c.resolve_round(ticket, outcome(50));
        c.accept_round_result().unwrap();

        // Round three: both sides are out, but player two types something in.
        assert_eq!(c.battle_status(), BattleStatus::Exhausted);
        let round = advance_round(&mut c, manual(PlayerId::Two, " 你才没理 "), &g)
            .unwrap()
            .unwrap();
        assert_eq!(round.p2_arg, "你才没理");
        assert!(round.is_p2_manual);
        assert_eq!(round.p1_arg, OUT_OF_ARGUMENTS);
        assert!(!round.is_p1_manual);
    }

    #[test]
    fn exhausted_without_manual_concludes() {
        let mut c = drafted(&["a1"], &["b1"]);
        let g = gateway(ScriptedOracle::down());
        advance_round(&mut c, None, &g).unwrap();
        c.accept_round_result().unwrap();

        assert_eq!(c.battle_status(), BattleStatus::Exhausted);
        assert_eq!(c.begin_round(None), Ok(RoundStart::Concluded));
        assert_eq!(c.phase(), Phase::Result);
        assert_eq!(c.state().rounds.len(), 1);
    }

    #[test]
    fn blank_manual_text_counts_as_none() {
        let mut c = drafted(&["a1"], &["b1"]);
        let g = gateway(ScriptedOracle::down());
        advance_round(&mut c, None, &g).unwrap();
        c.accept_round_result().unwrap();

        assert_eq!(
            c.begin_round(manual(PlayerId::One, "   ")),
            Ok(RoundStart::Concluded)
        );
    }

    #[test]
    fn accept_requires_a_judged_round() {
        let mut c = drafted(&["a1"], &["b1"]);
        assert_eq!(c.accept_round_result(), Err(ValidationError::RoundNotFinished));
    }

    #[test]
    fn end_to_end_three_rounds() {
        let mut c = GameController::new();
        assert!(c.complete_setup("甲", "乙", "").is_err());
        c.complete_setup("甲", "乙", "T").unwrap();

        c.toggle_argument(PlayerId::One, "a1").unwrap();
        c.toggle_argument(PlayerId::One, "a2").unwrap();
        c.confirm_draft(PlayerId::One, "").unwrap();
        c.toggle_argument(PlayerId::Two, "b1").unwrap();
        c.confirm_draft(PlayerId::Two, "").unwrap();
        assert_eq!(c.phase(), Phase::Battle);

        let g = gateway(ScriptedOracle::new(vec![
            Ok(verdict_json(70)),
            Ok(verdict_json(30)),
            Ok(verdict_json(50)),
        ]));

        // Round 1 starts on its own.
        assert_eq!(c.battle_status(), BattleStatus::Ready);
        let r1 = advance_round(&mut c, None, &g).unwrap().unwrap();
        assert_eq!((r1.p1_arg.as_str(), r1.p2_arg.as_str()), ("a1", "b1"));
        assert_eq!(r1.winner.id(), 1);
        c.accept_round_result().unwrap();

        // Round 2 waits for player two.
        assert_eq!(c.battle_status(), BattleStatus::AwaitingManual(PlayerId::Two));
        let r2 = advance_round(&mut c, manual(PlayerId::Two, "b2"), &g)
            .unwrap()
            .unwrap();
        assert_eq!(r2.p1_arg, "a2");
        assert!(r2.is_p2_manual);
        assert_eq!(r2.winner.id(), 2);
        c.accept_round_result().unwrap();

        // Round 3: both out, player one improvises.
        let r3 = advance_round(&mut c, manual(PlayerId::One, "a3"), &g)
            .unwrap()
            .unwrap();
        assert_eq!(r3.winner, RoundWinner::Tie);
        c.accept_round_result().unwrap();

        let s = c.state();
        assert_eq!(s.phase, Phase::Result);
        assert_eq!(s.rounds.len(), MAX_ROUNDS);
        assert_eq!(
            s.total_p1_votes + s.total_p2_votes,
            100 * s.rounds.len() as u32
        );
        assert_eq!(s.total_p1_votes, 150);

        let verdict = c.verdict().unwrap();
        assert_eq!(verdict.winner, FinalWinner::Draw);
        assert_eq!(verdict.basis, VerdictBasis::Votes);
        assert_eq!(verdict.rounds_played, 3);
    }

    #[test]
    fn history_is_bounded_by_max_rounds() {
        let args = ["1", "2", "3", "4", "5"];
        let mut c = drafted(&args, &args);
        let g = gateway(ScriptedOracle::down());

        let mut last_len = 0;
        while c.phase() == Phase::Battle {
            match c.battle_status() {
                BattleStatus::RoundComplete => c.accept_round_result().unwrap(),
                _ => {
                    advance_round(&mut c, None, &g).unwrap();
                }
            }
            assert!(c.state().rounds.len() >= last_len);
            last_len = c.state().rounds.len();
        }

        assert_eq!(c.state().rounds.len(), MAX_ROUNDS);
        assert!(c.state().rounds.iter().all(|r| r.reason == FALLBACK_REASON));
    }

    #[test]
    fn surrender_needs_confirmation_and_wins_for_the_other_side() {
        let mut c = drafted(&["a1"], &["b1"]);
        let RoundStart::Dispatched { ticket, .. } = c.begin_round(None).unwrap() else {
            panic!("expected a dispatched round");
        };

        c.request_surrender(PlayerId::One).unwrap();
        assert_eq!(c.phase(), Phase::Battle);
        c.cancel_surrender();
        assert_eq!(c.confirm_surrender(), Err(ValidationError::NoSurrenderPending));

        c.request_surrender(PlayerId::One).unwrap();
        assert_eq!(c.confirm_surrender(), Ok(PlayerId::One));
        assert_eq!(c.phase(), Phase::Result);
        assert_eq!(c.state().surrender_by, Some(PlayerId::One));
        assert!(!c.state().is_battle_processing);

        // The in-flight round lands after the game ended.
        assert!(c.resolve_round(ticket, outcome(90)).is_none());
        assert!(c.state().rounds.is_empty());

        let verdict = c.verdict().unwrap();
        assert_eq!(verdict.winner_id(), Some(PlayerId::Two));
        assert_eq!(verdict.basis, VerdictBasis::Surrender(PlayerId::One));
    }

    #[test]
    fn unanswered_surrender_does_not_carry_into_the_next_game() {
        let mut c = drafted(&["a1"], &["b1"]);
        let g = gateway(ScriptedOracle::down());

        c.request_surrender(PlayerId::One).unwrap();
        advance_round(&mut c, None, &g).unwrap();
        c.accept_round_result().unwrap();
        assert_eq!(c.begin_round(None), Ok(RoundStart::Concluded));
        assert_eq!(c.pending_surrender(), None);

        c.rematch().unwrap();
        assert_eq!(c.phase(), Phase::P1Draft);
        assert_eq!(c.pending_surrender(), None);
        assert_eq!(c.confirm_surrender(), Err(ValidationError::NoSurrenderPending));
        assert_eq!(c.phase(), Phase::P1Draft);
    }

    #[test]
    fn rejected_surrender_confirmation_changes_nothing() {
        let mut c = GameController::new();
        c.complete_setup("甲", "乙", "T").unwrap();
        c.request_surrender(PlayerId::Two).unwrap();

        // Force the request into a phase that no longer allows it.
        c.state.phase = Phase::Setup;
        assert_eq!(
            c.confirm_surrender(),
            Err(ValidationError::WrongPhase {
                actual: Phase::Setup
            })
        );
        assert_eq!(c.pending_surrender(), Some(PlayerId::Two));
    }

    #[test]
    fn player_one_can_fight_back_by_hand() {
        let mut c = drafted(&["a1"], &["b1", "b2"]);
        let g = gateway(ScriptedOracle::down());
        advance_round(&mut c, None, &g).unwrap();
        c.accept_round_result().unwrap();

        assert_eq!(c.battle_status(), BattleStatus::AwaitingManual(PlayerId::One));
        let RoundStart::Dispatched { matchup, .. } =
            c.begin_round(manual(PlayerId::One, " 咸才是正道 ")).unwrap()
        else {
            panic!("expected a dispatched round");
        };
        assert_eq!(matchup.p1_arg, "咸才是正道");
        assert!(matchup.is_p1_manual);
        assert_eq!(matchup.p2_arg, "b2");
        assert!(!matchup.is_p2_manual);
    }

    #[test]
    fn surrender_works_during_draft() {
        let mut c = GameController::new();
        assert!(c.request_surrender(PlayerId::Two).is_err());

        c.complete_setup("甲", "乙", "T").unwrap();
        c.request_surrender(PlayerId::Two).unwrap();
        c.confirm_surrender().unwrap();
        assert_eq!(c.verdict().unwrap().winner_id(), Some(PlayerId::One));
    }

    #[test]
    fn reset_drops_in_flight_results() {
        let mut c = drafted(&["a1"], &["b1"]);
        let RoundStart::Dispatched { ticket, .. } = c.begin_round(None).unwrap() else {
            panic!("expected a dispatched round");
        };

        c.reset();
        assert_eq!(c.phase(), Phase::Setup);
        assert!(c.state().topic.is_empty());

        // Replay the same game up to the same round index.
        c.complete_setup("甲", "乙", "T").unwrap();
        c.toggle_argument(PlayerId::One, "a1").unwrap();
        c.confirm_draft(PlayerId::One, "").unwrap();
        c.toggle_argument(PlayerId::Two, "b1").unwrap();
        c.confirm_draft(PlayerId::Two, "").unwrap();
        let RoundStart::Dispatched { ticket: fresh, .. } = c.begin_round(None).unwrap() else {
            panic!("expected a dispatched round");
        };
        assert_ne!(ticket, fresh);

        assert!(c.resolve_round(ticket, outcome(99)).is_none());
        assert!(c.state().is_battle_processing);
        assert_eq!(c.resolve_round(fresh, outcome(20)).unwrap().vote_p1, 20);
    }

    #[test]
    fn rematch_keeps_players_and_topic() {
        let mut c = drafted(&["a1"], &["b1"]);
        let g = gateway(ScriptedOracle::down());
        assert_eq!(c.rematch(), Err(ValidationError::WrongPhase { actual: Phase::Battle }));

        advance_round(&mut c, None, &g).unwrap();
        c.request_surrender(PlayerId::Two).unwrap();
        c.confirm_surrender().unwrap();

        c.rematch().unwrap();
        let s = c.state();
        assert_eq!(s.phase, Phase::P1Draft);
        assert_eq!(s.topic, "T");
        assert_eq!(s.p2.nickname, "乙");
        assert_eq!(s.p1.team, vec!["a1".to_string()]);
        assert!(s.rounds.is_empty());
        assert_eq!((s.total_p1_votes, s.total_p2_votes), (0, 0));
        assert_eq!(s.surrender_by, None);
    }

    #[test]
    fn equal_totals_are_a_draw() {
        let mut c = drafted(&["a1", "a2"], &["b1", "b2"]);
        let g = gateway(ScriptedOracle::new(vec![Ok(verdict_json(80)), Ok(verdict_json(20))]));

        advance_round(&mut c, None, &g).unwrap();
        c.accept_round_result().unwrap();
        advance_round(&mut c, None, &g).unwrap();
        c.accept_round_result().unwrap();
        assert_eq!(c.begin_round(None), Ok(RoundStart::Concluded));

        let verdict = c.verdict().unwrap();
        assert_eq!((verdict.total_p1_votes, verdict.total_p2_votes), (100, 100));
        assert_eq!(verdict.winner, FinalWinner::Draw);
    }
}
