use serde::{Deserialize, Serialize};

use crate::model::battle_round::BattleRound;
use crate::model::player::{Player, PlayerId};
use crate::model::verdict::{FinalVerdict, FinalWinner, VerdictBasis};

/// Rounds per battle.
pub const MAX_ROUNDS: usize = 3;

pub const MAX_TOPIC_CHARS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    P1Draft,
    P2Draft,
    Battle,
    Result,
}

impl Phase {
    pub fn draft_of(player: PlayerId) -> Self {
        match player {
            PlayerId::One => Phase::P1Draft,
            PlayerId::Two => Phase::P2Draft,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Setup => "setup",
            Phase::P1Draft => "player 1 draft",
            Phase::P2Draft => "player 2 draft",
            Phase::Battle => "battle",
            Phase::Result => "result",
        };
        f.write_str(name)
    }
}

/// The aggregate root of one game.
/// Only the controller mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub topic: String,
    pub p1: Player,
    pub p2: Player,
    pub rounds: Vec<BattleRound>,
    pub current_round_index: usize,
    pub total_p1_votes: u32,
    pub total_p2_votes: u32,
    pub phase: Phase,
    pub is_battle_processing: bool,
    pub surrender_by: Option<PlayerId>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            topic: String::new(),
            p1: Player::new(PlayerId::One),
            p2: Player::new(PlayerId::Two),
            rounds: Vec::new(),
            current_round_index: 0,
            total_p1_votes: 0,
            total_p2_votes: 0,
            phase: Phase::Setup,
            is_battle_processing: false,
            surrender_by: None,
        }
    }
}

impl GameState {
    pub fn player(&self, id: PlayerId) -> &Player {
        match id {
            PlayerId::One => &self.p1,
            PlayerId::Two => &self.p2,
        }
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        match id {
            PlayerId::One => &mut self.p1,
            PlayerId::Two => &mut self.p2,
        }
    }

    pub fn nickname(&self, id: PlayerId) -> &str {
        &self.player(id).nickname
    }

    /// The round at the current index, once it has been adjudicated.
    pub fn current_round(&self) -> Option<&BattleRound> {
        self.rounds.get(self.current_round_index)
    }

    pub fn is_current_round_played(&self) -> bool {
        self.rounds.len() > self.current_round_index
    }

    /// The final verdict; only available in the result phase.
    pub fn final_verdict(&self) -> Option<FinalVerdict> {
        if self.phase != Phase::Result {
            return None;
        }

        let (winner, basis) = match self.surrender_by {
            Some(loser) => (FinalWinner::Player(loser.other()), VerdictBasis::Surrender(loser)),
            None => {
                let winner = match self.total_p1_votes.cmp(&self.total_p2_votes) {
                    std::cmp::Ordering::Greater => FinalWinner::Player(PlayerId::One),
                    std::cmp::Ordering::Less => FinalWinner::Player(PlayerId::Two),
                    std::cmp::Ordering::Equal => FinalWinner::Draw,
                };
                (winner, VerdictBasis::Votes)
            }
        };

        Some(FinalVerdict {
            winner,
            basis,
            total_p1_votes: self.total_p1_votes,
            total_p2_votes: self.total_p2_votes,
            rounds_played: self.rounds.len(),
        })
    }
}
