use serde::{Deserialize, Serialize};

use crate::model::player::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalWinner {
    Player(PlayerId),
    /// Equal vote totals.
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictBasis {
    /// The named player waved the white flag.
    Surrender(PlayerId),
    Votes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalVerdict {
    pub winner: FinalWinner,
    pub basis: VerdictBasis,
    pub total_p1_votes: u32,
    pub total_p2_votes: u32,
    pub rounds_played: usize,
}

impl FinalVerdict {
    pub fn winner_id(&self) -> Option<PlayerId> {
        match self.winner {
            FinalWinner::Player(p) => Some(p),
            FinalWinner::Draw => None,
        }
    }
}
