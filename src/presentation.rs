use crate::game::{Game, Operation, State};

/// Builds the user-facing text for game events. The referee only ever
/// supplies semantic values; implementations own the wording.
pub trait GamePresentation {
    /// Summary of the game so far, naming whoever moves next or has won.
    fn state_representation(&self, game: &Game, player_one: &str, player_two: &str) -> String;

    /// Announcement of whose turn it is.
    fn next_move_notice(&self, player: &str) -> String;

    /// Report of a completed move.
    fn move_report(&self, mov: u32, player: &str) -> String;

    /// Prompt asking the user for a move.
    fn move_prompt(&self, game: &Game) -> String;

    /// Correction shown after a rejected move.
    fn illegal_move_notification(&self, game: &Game) -> String;
}

fn verb(operation: Operation) -> &'static str {
    match operation {
        Operation::Addition => "add",
        Operation::Subtraction => "subtract",
    }
}

/// Console wording, selected per operation.
pub struct TextPresentation {
    operation: Operation,
}

impl TextPresentation {
    pub fn new(operation: Operation) -> TextPresentation {
        TextPresentation { operation }
    }
}

impl GamePresentation for TextPresentation {
    fn state_representation(&self, game: &Game, player_one: &str, player_two: &str) -> String {
        let mut text = String::new();
        if game.is_first_move() {
            text.push_str(&match game.operation() {
                Operation::Addition => format!(
                    "\nFirst to reach exactly {} wins.\n",
                    game.target()
                ),
                Operation::Subtraction => format!(
                    "\nFirst to bring the count from {} down to zero wins.\n",
                    game.upper_bound()
                ),
            });
        }
        let player = match game.state() {
            State::PlayerOneMove | State::PlayerOneWin => player_one,
            State::PlayerTwoMove | State::PlayerTwoWin => player_two,
        };
        let outcome = if game.state().is_terminal() {
            format!("{} won the game!", player)
        } else {
            format!("{} to move.", player)
        };
        text.push_str(&match game.operation() {
            Operation::Addition => format!(
                "\nThe count stands at {}, {} short of the target of {}. {}\n",
                game.count(),
                game.remaining(),
                game.target(),
                outcome
            ),
            Operation::Subtraction => format!(
                "\nThe count is down to {} (started at {}), {} short of zero. {}\n",
                game.count(),
                game.upper_bound(),
                game.remaining(),
                outcome
            ),
        });
        text
    }

    fn next_move_notice(&self, player: &str) -> String {
        format!("Next move: {}.\n", player)
    }

    fn move_report(&self, mov: u32, player: &str) -> String {
        format!("{} chose to {} {}.\n", player, verb(self.operation), mov)
    }

    fn move_prompt(&self, game: &Game) -> String {
        format!(
            "How much do you want to {}? (1-{}) ",
            verb(game.operation()),
            game.max_move().min(game.remaining())
        )
    }

    fn illegal_move_notification(&self, game: &Game) -> String {
        match game.operation() {
            Operation::Addition => format!(
                "That move is not allowed: {} between 1 and {}, without passing {}.\n",
                verb(game.operation()),
                game.max_move(),
                game.target()
            ),
            Operation::Subtraction => format!(
                "That move is not allowed: {} between 1 and {}, without passing zero.\n",
                verb(game.operation()),
                game.max_move()
            ),
        }
    }
}
