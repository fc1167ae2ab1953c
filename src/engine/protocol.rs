use crate::engine::config::GatewayConfig;
use crate::engine::controller::RoundTicket;
use crate::model::battle_round::{Matchup, RoundOutcome};

pub enum EngineCommand {
    SuggestArguments {
        request_id: u64,
        topic: String,
        stance: String,
    },
    SimulateRound {
        ticket: RoundTicket,
        matchup: Matchup,
    },
    Reconfigure(GatewayConfig),
    TestConnection,
}

pub enum EngineResponse {
    ArgumentsSuggested {
        request_id: u64,
        arguments: Vec<String>,
    },
    RoundResolved {
        ticket: RoundTicket,
        outcome: RoundOutcome,
    },
    ConnectionStatus(Result<String, String>),
}
