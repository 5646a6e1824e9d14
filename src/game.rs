use std::fmt;
use std::str::FromStr;

pub const DEFAULT_UPPER_BOUND: u32 = 100;
pub const DEFAULT_MAX_MOVE: u32 = 10;

/// Direction of play. Every move either adds its magnitude to the count or
/// subtracts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Addition,
    Subtraction,
}
impl Operation {
    /// Signed step applied per point of move magnitude.
    pub fn unit_step(self) -> i64 {
        match self {
            Operation::Addition => 1,
            Operation::Subtraction => -1,
        }
    }

    /// Count a game with this operation starts from.
    pub fn starting_count(self, upper_bound: u32) -> u32 {
        match self {
            Operation::Addition => 0,
            Operation::Subtraction => upper_bound,
        }
    }

    /// Count that ends a game with this operation.
    pub fn target(self, upper_bound: u32) -> u32 {
        match self {
            Operation::Addition => upper_bound,
            Operation::Subtraction => 0,
        }
    }
}
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operation::Addition => write!(f, "addition"),
            Operation::Subtraction => write!(f, "subtraction"),
        }
    }
}
impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(text: &str) -> Result<Operation, ParseOperationError> {
        match text.to_lowercase().as_str() {
            "add" | "addition" => Ok(Operation::Addition),
            "subtract" | "subtraction" => Ok(Operation::Subtraction),
            _ => Err(ParseOperationError(text.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized operation \"{0}\"; expected \"add\" or \"subtract\"")]
pub struct ParseOperationError(String);

/// Whose turn it is or, once the game is over, who won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    PlayerOneMove,
    PlayerTwoMove,
    PlayerOneWin,
    PlayerTwoWin,
}
impl State {
    /// Whether a game may start in this state. Either player may open.
    pub fn is_initial(self) -> bool {
        matches!(self, State::PlayerOneMove | State::PlayerTwoMove)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, State::PlayerOneWin | State::PlayerTwoWin)
    }

    /// State after a non-winning move: the turn passes to the other player.
    /// Must not be called on a terminal state.
    pub fn next_move_state(self) -> State {
        match self {
            State::PlayerOneMove => State::PlayerTwoMove,
            State::PlayerTwoMove => State::PlayerOneMove,
            _ => panic!("no move follows terminal state {:?}", self),
        }
    }

    /// State after a winning move: the mover who just moved wins.
    /// Must not be called on a terminal state.
    pub fn next_win_state(self) -> State {
        match self {
            State::PlayerOneMove => State::PlayerOneWin,
            State::PlayerTwoMove => State::PlayerTwoWin,
            _ => panic!("no win follows terminal state {:?}", self),
        }
    }

    /// Applies a single move to a count. This is the whole rulebook in one
    /// pure function: move validation, the count update, and win detection.
    /// A rejected move reports which constraint it violated.
    pub fn play(
        self,
        upper_bound: u32,
        max_move: u32,
        count: u32,
        mov: u32,
        operation: Operation,
    ) -> Result<(u32, State), GameError> {
        if self.is_terminal() {
            return Err(GameError::GameFinished { count });
        }
        if mov < 1 || mov > max_move {
            return Err(GameError::MoveOutOfRange { mov, max_move });
        }
        let candidate = i64::from(count) + i64::from(mov) * operation.unit_step();
        if candidate < 0 || candidate > i64::from(upper_bound) {
            return Err(GameError::Overshoot {
                mov,
                count,
                candidate,
                upper_bound,
            });
        }
        let new_count = candidate as u32;
        let new_state = if new_count == operation.target(upper_bound) {
            self.next_win_state()
        } else {
            self.next_move_state()
        };
        Ok((new_count, new_state))
    }
}
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            State::PlayerOneMove => write!(f, "player one to move"),
            State::PlayerTwoMove => write!(f, "player two to move"),
            State::PlayerOneWin => write!(f, "player one won"),
            State::PlayerTwoWin => write!(f, "player two won"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("game is already in a terminal state (count = {count}); no further moves allowed")]
    GameFinished { count: u32 },

    #[error("attempted move ({mov}) is outside the allowed range (1-{max_move})")]
    MoveOutOfRange { mov: u32, max_move: u32 },

    #[error(
        "a move of {mov} with a current count of {count} would result in a count \
         of {candidate}, outside the allowed range (0-{upper_bound})"
    )]
    Overshoot {
        mov: u32,
        count: u32,
        candidate: i64,
        upper_bound: u32,
    },

    #[error("{0}")]
    InvalidConfiguration(String),
}
impl GameError {
    /// Whether a referee may recover by re-soliciting the same mover.
    pub fn is_illegal_move(&self) -> bool {
        matches!(
            self,
            GameError::MoveOutOfRange { .. } | GameError::Overshoot { .. }
        )
    }
}

/// Immutable construction parameters for a single game.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    pub operation: Operation,
    pub upper_bound: u32,
    pub max_move: u32,
    pub initial_state: State,
}
impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.max_move == 0 || self.max_move >= self.upper_bound {
            return Err(GameError::InvalidConfiguration(format!(
                "game upper bound ({}) and max move ({}) must both be positive, \
                 with upper bound > max move",
                self.upper_bound, self.max_move
            )));
        }
        if !self.initial_state.is_initial() {
            return Err(GameError::InvalidConfiguration(format!(
                "{} is not a valid initial state",
                self.initial_state
            )));
        }
        Ok(())
    }
}
impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            operation: Operation::Addition,
            upper_bound: DEFAULT_UPPER_BOUND,
            max_move: DEFAULT_MAX_MOVE,
            initial_state: State::PlayerOneMove,
        }
    }
}

/// Read-only snapshot of a game, handed to strategies. Strategies never see
/// the game itself.
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    pub operation: Operation,
    pub max_move: u32,
    pub target: u32,
    pub count: u32,
    pub state: State,
}

impl GameView {
    /// Unit steps still needed to reach the target along the direction of
    /// travel. Never negative.
    pub fn remaining(&self) -> u32 {
        match self.operation {
            Operation::Addition => self.target - self.count,
            Operation::Subtraction => self.count,
        }
    }
}

/// A single game in progress: the immutable configuration plus the running
/// count and turn state. The count and state change only through `play`.
#[derive(Debug, Clone)]
pub struct Game {
    operation: Operation,
    upper_bound: u32,
    max_move: u32,
    target: u32,
    count: u32,
    state: State,
    first_move: bool,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Game, GameError> {
        config.validate()?;
        Ok(Game {
            operation: config.operation,
            upper_bound: config.upper_bound,
            max_move: config.max_move,
            target: config.operation.target(config.upper_bound),
            count: config.operation.starting_count(config.upper_bound),
            state: config.initial_state,
            first_move: true,
        })
    }

    /// Applies a move for the current mover and returns the new state. The
    /// only mutator on a game; a rejected move leaves the count and state
    /// untouched.
    pub fn play(&mut self, mov: u32) -> Result<State, GameError> {
        let (new_count, new_state) =
            self.state
                .play(self.upper_bound, self.max_move, self.count, mov, self.operation)?;
        self.count = new_count;
        self.state = new_state;
        self.first_move = false;
        Ok(new_state)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Unit steps still needed to reach the target along the direction of
    /// travel. Never negative.
    pub fn remaining(&self) -> u32 {
        self.view().remaining()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn max_move(&self) -> u32 {
        self.max_move
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn upper_bound(&self) -> u32 {
        self.upper_bound
    }

    /// True until the first successful move of the game.
    pub fn is_first_move(&self) -> bool {
        self.first_move
    }

    pub fn view(&self) -> GameView {
        GameView {
            operation: self.operation,
            max_move: self.max_move,
            target: self.target,
            count: self.count,
            state: self.state,
        }
    }
}
