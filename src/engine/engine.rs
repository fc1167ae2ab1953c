use std::sync::mpsc::{Receiver, Sender};

use tracing::{info, warn};

use crate::engine::gateway::Gateway;
use crate::engine::protocol::{EngineCommand, EngineResponse};

/// Worker that owns the gateway and serves UI commands one at a time,
/// so at most one oracle call is ever in flight.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    gateway: Gateway,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        gateway: Gateway,
    ) -> Self {
        Self { rx, tx, gateway }
    }

    /// Runs until the UI side hangs up.
    pub fn run(&mut self) {
        info!(oracle = self.gateway.oracle_name(), "engine started");

        while let Ok(cmd) = self.rx.recv() {
            let response = match cmd {
                EngineCommand::SuggestArguments {
                    request_id,
                    topic,
                    stance,
                } => Some(EngineResponse::ArgumentsSuggested {
                    request_id,
                    arguments: self.gateway.generate_arguments(&topic, &stance),
                }),

                EngineCommand::SimulateRound { ticket, matchup } => {
                    Some(EngineResponse::RoundResolved {
                        ticket,
                        outcome: self.gateway.simulate_battle_round(&matchup),
                    })
                }

                EngineCommand::Reconfigure(config) => {
                    match Gateway::connect(&config) {
                        Ok(gateway) => {
                            info!(base_url = %config.base_url, model = %config.model, "gateway reconfigured");
                            self.gateway = gateway;
                        }
                        Err(e) => warn!(error = %e, "keeping previous gateway"),
                    }
                    None
                }

                EngineCommand::TestConnection => Some(EngineResponse::ConnectionStatus(
                    self.gateway.probe().map_err(|e| e.to_string()),
                )),
            };

            if let Some(response) = response {
                if self.tx.send(response).is_err() {
                    break;
                }
            }
        }

        info!("engine stopped");
    }
}
