use serde::{Deserialize, Serialize};

/// Maximum number of arguments a player can draft into their team.
pub const TEAM_CAPACITY: usize = 10;

pub const MAX_NICKNAME_CHARS: usize = 8;
pub const MAX_STANCE_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    /// Key into the speaker colour table of the UI settings.
    pub fn color_key(self) -> &'static str {
        match self {
            PlayerId::One => "PlayerOne",
            PlayerId::Two => "PlayerTwo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Team is full and the argument was not in it.
    Full,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,

    /// Free-text stance typed during the draft.
    pub main_view: String,

    /// Drafted arguments in pick order; index `n` is played in round `n + 1`.
    pub team: Vec<String>,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            nickname: String::new(),
            main_view: String::new(),
            team: Vec::new(),
        }
    }

    pub fn toggle_argument(&mut self, arg: &str) -> ToggleOutcome {
        if let Some(pos) = self.team.iter().position(|a| a == arg) {
            self.team.remove(pos);
            return ToggleOutcome::Removed;
        }

        if self.team.len() >= TEAM_CAPACITY {
            return ToggleOutcome::Full;
        }

        self.team.push(arg.to_string());
        ToggleOutcome::Added
    }

    pub fn has_argument(&self, arg: &str) -> bool {
        self.team.iter().any(|a| a == arg)
    }

    pub fn argument_for_round(&self, round_index: usize) -> Option<&str> {
        self.team
            .get(round_index)
            .map(String::as_str)
            .filter(|a| !a.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_team() {
        let mut p = Player::new(PlayerId::One);
        p.toggle_argument("a");
        let before = p.team.clone();

        assert_eq!(p.toggle_argument("b"), ToggleOutcome::Added);
        assert_eq!(p.toggle_argument("b"), ToggleOutcome::Removed);
        assert_eq!(p.team, before);
    }

    #[test]
    fn team_never_exceeds_capacity() {
        let mut p = Player::new(PlayerId::Two);
        for i in 0..15 {
            p.toggle_argument(&format!("arg {i}"));
        }

        assert_eq!(p.team.len(), TEAM_CAPACITY);
        assert_eq!(p.toggle_argument("one more"), ToggleOutcome::Full);
        assert!(!p.has_argument("one more"));

        // Removing still works on a full team.
        assert_eq!(p.toggle_argument("arg 0"), ToggleOutcome::Removed);
        assert_eq!(p.team.len(), TEAM_CAPACITY - 1);
        assert_eq!(p.team[0], "arg 1");
    }

    #[test]
    fn round_arguments_follow_pick_order() {
        let mut p = Player::new(PlayerId::One);
        p.toggle_argument("first");
        p.toggle_argument("second");

        assert_eq!(p.argument_for_round(0), Some("first"));
        assert_eq!(p.argument_for_round(1), Some("second"));
        assert_eq!(p.argument_for_round(2), None);
    }

    #[test]
    fn other_player() {
        assert_eq!(PlayerId::One.other(), PlayerId::Two);
        assert_eq!(PlayerId::Two.other().number(), 1);
    }
}
