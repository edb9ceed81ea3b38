//! End-of-frame state transitions: defeat and victory.

use log::info;

use crate::entities::{GameStatus, WorldState};

pub fn update(state: &mut WorldState) {
    if state.status.is_terminal() {
        return;
    }

    if state.players.iter().all(|p| !p.is_alive()) {
        state.status = GameStatus::GameOver;
        info!("game over at frame {} with score {}", state.frame, state.score);
        return;
    }

    if let Some(needed) = state.config.bosses_to_win {
        if state.bosses_defeated >= needed {
            state.status = GameStatus::Won;
            info!("victory at frame {} with score {}", state.frame, state.score);
        }
    }
}
