use std::fs;
use std::path::Path;

use lib::{Action, Agent, Scenario};
use tracing::{info, warn};

/// Reads the game description at `path` and lets `agent` pick the action.
/// Anything wrong with the input is logged and answered with a pass.
pub fn calc_move(path: &Path, agent: &dyn Agent) -> Action {
    match fs::read_to_string(path) {
        Ok(text) => move_for(&text, agent),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read input, passing");
            Action::Pass
        }
    }
}

pub fn move_for(text: &str, agent: &dyn Agent) -> Action {
    let scenario = match Scenario::parse(text) {
        Ok(scenario) => scenario,
        Err(e) => {
            warn!(error = %e, "invalid input, passing");
            return Action::Pass;
        }
    };
    info!(
        agent = agent.name(),
        side = %scenario.side,
        height = scenario.arena.height,
        width = scenario.arena.width,
        "choosing move"
    );
    agent.choose_move(&scenario.arena, &scenario.state, scenario.side)
}
