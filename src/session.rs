use std::io::{self, Write};

use tracing::info;

use crate::game::{GameConfig, GameError};
use crate::json_output::game_json;
use crate::presentation::TextPresentation;
use crate::referee::{HumanInput, MoveSource, PlayerSlot, Referee, RefereeError};
use crate::strategy::Strategy;

pub const PLAYER_NAME: &str = "You";
pub const COMPUTER_NAME: &str = "Computer";

const PLAY_AGAIN_PROMPT: &str = "Play another round? (y/n) ";
const NEGATIVE_RESPONSE: &str = "n";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Referee(#[from] RefereeError),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Plays console games against the computer until the user bows out,
/// alternating which player opens each round.
pub struct ConsoleSession {
    config: GameConfig,
    input: HumanInput,
    strategy: Strategy,
    json: bool,
}

impl ConsoleSession {
    pub fn new(config: GameConfig, strategy: Strategy, json: bool) -> ConsoleSession {
        ConsoleSession::with_input(
            config,
            strategy,
            json,
            HumanInput::new(Box::new(io::stdin().lock())),
        )
    }

    pub fn with_input(
        config: GameConfig,
        strategy: Strategy,
        json: bool,
        input: HumanInput,
    ) -> ConsoleSession {
        ConsoleSession {
            config,
            input,
            strategy,
            json,
        }
    }

    pub fn run(&mut self, output: &mut dyn Write) -> Result<(), SessionError> {
        let presentation = TextPresentation::new(self.config.operation);
        let mut initial_state = self.config.initial_state;
        loop {
            let config = GameConfig {
                initial_state,
                ..self.config
            };
            let (final_state, records) = {
                let mut referee = Referee::new(
                    config,
                    [
                        PlayerSlot {
                            name: PLAYER_NAME,
                            source: MoveSource::Human(&mut self.input),
                        },
                        PlayerSlot {
                            name: COMPUTER_NAME,
                            source: MoveSource::Computer(&mut self.strategy),
                        },
                    ],
                    &presentation,
                    &mut *output,
                )?;
                let state = referee.play()?;
                (state, referee.records().to_vec())
            };
            info!("game over: {}", final_state);
            if self.json {
                writeln!(output, "{}", game_json(&config, &records, final_state))?;
            }
            initial_state = initial_state.next_move_state();
            if !self.keep_playing(output)? {
                break;
            }
        }
        Ok(())
    }

    fn keep_playing(&mut self, output: &mut dyn Write) -> Result<bool, SessionError> {
        match self.input.read_response(PLAY_AGAIN_PROMPT, output)? {
            Some(response) => Ok(!response.starts_with(NEGATIVE_RESPONSE)),
            None => Ok(false),
        }
    }
}
