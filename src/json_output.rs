use serde_json::{json, Value};

use crate::game::{GameConfig, State};
use crate::referee::MoveRecord;

fn player_number(state: State) -> u32 {
    match state {
        State::PlayerOneMove | State::PlayerOneWin => 1,
        State::PlayerTwoMove | State::PlayerTwoWin => 2,
    }
}

fn move_json(record: &MoveRecord) -> Value {
    json!({
        "player": player_number(record.mover),
        "move": record.mov,
        "count": record.count,
    })
}

/// Transcript of one finished game.
pub fn game_json(config: &GameConfig, records: &[MoveRecord], final_state: State) -> Value {
    json!({
        "operation": config.operation.to_string(),
        "bound": config.upper_bound,
        "max_move": config.max_move,
        "first_player": player_number(config.initial_state),
        "moves": records.iter().map(move_json).collect::<Vec<_>>(),
        "winner": player_number(final_state),
    })
}
