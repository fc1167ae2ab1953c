pub mod battle_round;
pub mod game_state;
pub mod player;
pub mod verdict;
