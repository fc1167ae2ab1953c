use serde::{Deserialize, Serialize};

use crate::model::player::PlayerId;

/// Said by a side whose prepared arguments have run out.
pub const OUT_OF_ARGUMENTS: &str = "我没词了！";

/// A single line of the generated dialogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
}

impl DialogueLine {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    /// Which side said this line, matched by nickname.
    pub fn side(&self, p1_name: &str, p2_name: &str) -> Option<PlayerId> {
        let speaker = self.speaker.trim();
        if speaker == p1_name {
            Some(PlayerId::One)
        } else if speaker == p2_name {
            Some(PlayerId::Two)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundWinner {
    Player(PlayerId),
    Tie,
}

impl RoundWinner {
    pub fn from_score(vote_p1: u8) -> Self {
        match vote_p1 {
            v if v > 50 => RoundWinner::Player(PlayerId::One),
            v if v < 50 => RoundWinner::Player(PlayerId::Two),
            _ => RoundWinner::Tie,
        }
    }

    /// 1, 2, or 0 for a tie.
    pub fn id(self) -> u8 {
        match self {
            RoundWinner::Player(p) => p.number(),
            RoundWinner::Tie => 0,
        }
    }
}

/// Everything the gateway needs to stage one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    pub topic: String,
    pub p1_arg: String,
    pub p1_name: String,
    pub p2_arg: String,
    pub p2_name: String,
    pub is_p1_manual: bool,
    pub is_p2_manual: bool,
}

/// What the gateway hands back for a round. Always well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub dialogue: Vec<DialogueLine>,
    pub vote_p1: u8,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleRound {
    pub round_number: usize,
    pub p1_arg: String,
    pub p2_arg: String,
    pub is_p1_manual: bool,
    pub is_p2_manual: bool,
    pub dialogue: Vec<DialogueLine>,
    pub vote_p1: u8,
    pub winner: RoundWinner,
    pub reason: String,
}

impl BattleRound {
    pub fn new(round_number: usize, matchup: &Matchup, outcome: RoundOutcome) -> Self {
        let vote_p1 = outcome.vote_p1.min(100);

        Self {
            round_number,
            p1_arg: matchup.p1_arg.clone(),
            p2_arg: matchup.p2_arg.clone(),
            is_p1_manual: matchup.is_p1_manual,
            is_p2_manual: matchup.is_p2_manual,
            dialogue: outcome.dialogue,
            vote_p1,
            winner: RoundWinner::from_score(vote_p1),
            reason: outcome.reason,
        }
    }

    pub fn vote_p2(&self) -> u8 {
        100 - self.vote_p1
    }
}
