use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::game::{Game, GameConfig, GameError, State};
use crate::presentation::GamePresentation;
use crate::strategy::Strategy;

/// Parse attempts allowed per solicitation before the input is declared
/// unusable.
const MAX_INPUT_ATTEMPTS: u32 = 3;

#[derive(Debug, thiserror::Error)]
pub enum RefereeError {
    #[error("no usable move obtained from input after {attempts} attempts")]
    InputExhausted { attempts: u32 },

    #[error("strategy produced an illegal move: {0}")]
    StrategyContract(GameError),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Collects integer moves from a reader, re-prompting on input that does
/// not parse.
pub struct HumanInput {
    reader: Box<dyn BufRead>,
}

impl HumanInput {
    pub fn new(reader: Box<dyn BufRead>) -> HumanInput {
        HumanInput { reader }
    }

    fn get_move(&mut self, prompt: &str, output: &mut dyn Write) -> Result<u32, RefereeError> {
        for _ in 0..MAX_INPUT_ATTEMPTS {
            write!(output, "{}", prompt)?;
            output.flush()?;
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }
            match line.trim().parse::<u32>() {
                Ok(mov) => return Ok(mov),
                Err(_) => debug!("unparseable move input: {:?}", line.trim()),
            }
        }
        Err(RefereeError::InputExhausted {
            attempts: MAX_INPUT_ATTEMPTS,
        })
    }

    /// One free-form prompt/answer exchange, trimmed and lowercased.
    /// Returns None at end of input.
    pub fn read_response(
        &mut self,
        prompt: &str,
        output: &mut dyn Write,
    ) -> io::Result<Option<String>> {
        write!(output, "{}", prompt)?;
        output.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }
}

/// Where a player's moves come from.
pub enum MoveSource<'a> {
    Human(&'a mut HumanInput),
    Computer(&'a mut Strategy),
}

/// One seat at the table: a display name and a source of moves.
pub struct PlayerSlot<'a> {
    pub name: &'a str,
    pub source: MoveSource<'a>,
}

/// One completed move, as kept for the game transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    /// Move-state of the player who made the move.
    pub mover: State,
    pub mov: u32,
    /// Count after the move was applied.
    pub count: u32,
}

/// Drives a single game to completion: solicits each move from the current
/// mover's source, applies it to the game, and reports progress through the
/// presentation. Owns the only Game instance; strategies see snapshots.
pub struct Referee<'a> {
    game: Game,
    players: [PlayerSlot<'a>; 2],
    presentation: &'a dyn GamePresentation,
    output: &'a mut dyn Write,
    records: Vec<MoveRecord>,
}

impl<'a> Referee<'a> {
    pub fn new(
        config: GameConfig,
        players: [PlayerSlot<'a>; 2],
        presentation: &'a dyn GamePresentation,
        output: &'a mut dyn Write,
    ) -> Result<Referee<'a>, GameError> {
        Ok(Referee {
            game: Game::new(config)?,
            players,
            presentation,
            output,
            records: Vec::new(),
        })
    }

    /// Runs the turn loop until someone wins, then reports the final state
    /// once. No game restarts here.
    pub fn play(&mut self) -> Result<State, RefereeError> {
        while !self.game.state().is_terminal() {
            self.present_state()?;
            let mover_state = self.game.state();
            let mover = slot(mover_state);
            debug!(
                "turn {}: {} ({})",
                self.records.len() + 1,
                self.players[mover].name,
                mover_state
            );
            let notice = self.presentation.next_move_notice(self.players[mover].name);
            self.present(&notice)?;
            loop {
                let mov = self.next_move(mover)?;
                match self.game.play(mov) {
                    Ok(_) => {
                        debug!(
                            "move {} applied: count {}, {}",
                            mov,
                            self.game.count(),
                            self.game.state()
                        );
                        self.records.push(MoveRecord {
                            mover: mover_state,
                            mov,
                            count: self.game.count(),
                        });
                        let report = self.presentation.move_report(mov, self.players[mover].name);
                        self.present(&report)?;
                        break;
                    }
                    Err(err) if err.is_illegal_move() => {
                        let notification = self.presentation.illegal_move_notification(&self.game);
                        self.present(&notification)?;
                        if let MoveSource::Computer(_) = self.players[mover].source {
                            // strategies are bound to emit legal moves only
                            warn!("broken strategy contract: {}", err);
                            return Err(RefereeError::StrategyContract(err));
                        }
                    }
                    Err(err) => return Err(RefereeError::Game(err)),
                }
            }
        }
        self.present_state()?;
        Ok(self.game.state())
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    fn next_move(&mut self, mover: usize) -> Result<u32, RefereeError> {
        let view = self.game.view();
        let prompt = self.presentation.move_prompt(&self.game);
        match &mut self.players[mover].source {
            MoveSource::Human(input) => input.get_move(&prompt, &mut *self.output),
            MoveSource::Computer(strategy) => {
                let mov = strategy.get_next_move(&view);
                debug!("{} strategy chose {}", strategy.name(), mov);
                Ok(mov)
            }
        }
    }

    fn present_state(&mut self) -> Result<(), RefereeError> {
        let text = self.presentation.state_representation(
            &self.game,
            self.players[0].name,
            self.players[1].name,
        );
        self.present(&text)
    }

    fn present(&mut self, text: &str) -> Result<(), RefereeError> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }
}

fn slot(state: State) -> usize {
    match state {
        State::PlayerOneMove | State::PlayerOneWin => 0,
        State::PlayerTwoMove | State::PlayerTwoWin => 1,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    use super::*;
    use crate::game::{GameConfig, Operation};
    use crate::presentation::TextPresentation;
    use crate::strategies::optimal::OptimalStrategy;
    use crate::strategy::Strategy;

    fn optimal(seed: u64) -> Strategy {
        Strategy::Optimal(OptimalStrategy::new(ChaChaRng::seed_from_u64(seed)))
    }

    fn human(script: &str) -> HumanInput {
        HumanInput::new(Box::new(Cursor::new(script.as_bytes().to_vec())))
    }

    fn computers_play(config: GameConfig) -> (State, Vec<MoveRecord>, String) {
        let mut one = optimal(1);
        let mut two = optimal(2);
        let presentation = TextPresentation::new(config.operation);
        let mut output = Vec::new();
        let mut referee = Referee::new(
            config,
            [
                PlayerSlot {
                    name: "Player 1",
                    source: MoveSource::Computer(&mut one),
                },
                PlayerSlot {
                    name: "Player 2",
                    source: MoveSource::Computer(&mut two),
                },
            ],
            &presentation,
            &mut output,
        )
        .unwrap();
        let state = referee.play().unwrap();
        let records = referee.records().to_vec();
        (state, records, String::from_utf8(output).unwrap())
    }

    #[test]
    fn first_optimal_mover_wins_the_hundred_game() {
        // 100 % 11 = 1: the opener plays 1, then mirrors every reply.
        let (state, records, output) = computers_play(GameConfig::default());
        assert_eq!(state, State::PlayerOneWin);
        assert_eq!(records[0].mov, 1);
        assert_eq!(records.last().unwrap().count, 100);
        assert!(output.contains("Player 1 won the game!"));
    }

    #[test]
    fn first_optimal_mover_wins_the_twenty_one_game() {
        // classic 21 game: 21 % 4 = 1
        let (state, records, _) = computers_play(GameConfig {
            operation: Operation::Subtraction,
            upper_bound: 21,
            max_move: 3,
            initial_state: State::PlayerOneMove,
        });
        assert_eq!(state, State::PlayerOneWin);
        assert_eq!(records[0].mov, 1);
        assert_eq!(records.last().unwrap().count, 0);
    }

    #[test]
    fn mirrored_replies_preserve_the_winning_margin() {
        let (_, records, _) = computers_play(GameConfig::default());
        // after the opening 1, each opposing move m is answered with 11 - m
        for pair in records[1..].chunks(2) {
            if let [reply, answer] = pair {
                assert_eq!(reply.mov + answer.mov, 11);
            }
        }
    }

    #[test]
    fn the_opening_player_slot_follows_the_initial_state() {
        let (state, records, _) = computers_play(GameConfig {
            initial_state: State::PlayerTwoMove,
            ..GameConfig::default()
        });
        assert_eq!(records[0].mover, State::PlayerTwoMove);
        assert_eq!(state, State::PlayerTwoWin);
    }

    #[test]
    fn movers_strictly_alternate() {
        let (_, records, _) = computers_play(GameConfig::default());
        for pair in records.windows(2) {
            assert_ne!(pair[0].mover, pair[1].mover);
        }
    }

    fn human_versus_optimal(script: &str) -> Result<(State, Vec<MoveRecord>, String), RefereeError> {
        let config = GameConfig {
            upper_bound: 5,
            max_move: 3,
            ..GameConfig::default()
        };
        let mut input = human(script);
        let mut opponent = optimal(0);
        let presentation = TextPresentation::new(config.operation);
        let mut output = Vec::new();
        let mut referee = Referee::new(
            config,
            [
                PlayerSlot {
                    name: "You",
                    source: MoveSource::Human(&mut input),
                },
                PlayerSlot {
                    name: "Computer",
                    source: MoveSource::Computer(&mut opponent),
                },
            ],
            &presentation,
            &mut output,
        )
        .unwrap();
        let state = referee.play()?;
        let records = referee.records().to_vec();
        Ok((state, records, String::from_utf8(output).unwrap()))
    }

    #[test]
    fn scripted_human_game_runs_to_completion() {
        // human adds 2, computer answers 3 for exactly 5
        let (state, records, output) = human_versus_optimal("2\n").unwrap();
        assert_eq!(state, State::PlayerTwoWin);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], MoveRecord { mover: State::PlayerOneMove, mov: 2, count: 2 });
        assert!(output.contains("Computer won the game!"));
    }

    #[test]
    fn malformed_input_is_reprompted() {
        let (state, records, _) = human_versus_optimal("three\n2\n").unwrap();
        assert_eq!(state, State::PlayerTwoWin);
        assert_eq!(records[0].mov, 2);
    }

    #[test]
    fn illegal_moves_resolicit_the_same_mover() {
        // 9 is over the move bound; the turn must not pass
        let (state, records, output) = human_versus_optimal("9\n2\n").unwrap();
        assert_eq!(state, State::PlayerTwoWin);
        assert_eq!(records[0], MoveRecord { mover: State::PlayerOneMove, mov: 2, count: 2 });
        assert!(output.contains("not allowed"));
    }

    #[test]
    fn exhausted_input_ends_the_run() {
        let err = human_versus_optimal("x\ny\nz\n").unwrap_err();
        assert!(matches!(err, RefereeError::InputExhausted { .. }));
    }

    #[test]
    fn end_of_input_ends_the_run() {
        let err = human_versus_optimal("").unwrap_err();
        assert!(matches!(err, RefereeError::InputExhausted { .. }));
    }
}
