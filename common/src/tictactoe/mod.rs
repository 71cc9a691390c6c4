mod board;
mod game_state;

pub use board::{Board, BoardPosition, BoardPositionError, Cell, Mark, BOARD_SIZE, WIN_LINES};
pub use game_state::{GameState, MoveError, Outcome, Phase};
