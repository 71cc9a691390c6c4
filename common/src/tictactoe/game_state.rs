use crate::messages::Message;
use crate::tictactoe::board::{Board, BoardPosition, BoardPositionError, Cell, Mark};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win(Mark),
    Draw,
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    WaitingForPlayers,
    InProgress,
    Finished(Outcome),
}

#[derive(Error, Debug, PartialEq)]
pub enum MoveError {
    #[error("Invalid move position: {0}")]
    OutOfRange(#[from] BoardPositionError),
    #[error("No game in progress (phase: {0:?})")]
    NotInProgress(Phase),
    #[error("Not {actual}'s turn, waiting on {expected}")]
    WrongTurn { expected: Mark, actual: Mark },
    #[error("Cell {0} is already occupied")]
    Occupied(usize),
}

// The single shared table: board, whose turn it is and where the game is
// in its lifecycle.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GameState {
    board: Board,
    current_turn: Mark,
    phase: Phase,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            board: Board::default(),
            current_turn: Mark::X,
            phase: Phase::WaitingForPlayers,
        }
    }
}

impl GameState {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_turn(&self) -> Mark {
        self.current_turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self.phase, Phase::InProgress)
    }

    // Returns false when the game was not waiting for players
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::WaitingForPlayers {
            return false;
        }
        self.phase = Phase::InProgress;
        self.current_turn = Mark::X;
        true
    }

    pub fn reset(&mut self) {
        *self = GameState::default();
    }

    // Places `acting`'s mark at `position` and returns the messages every
    // client needs to see as a result.
    // A rejected move leaves the state untouched. An accepted move that ends
    // the game leaves the state in `Phase::Finished`; the caller resets it
    // once the outcome has gone out.
    pub fn apply_move(&mut self, position: i64, acting: Mark) -> Result<Vec<Message>, MoveError> {
        let position = BoardPosition::new(position)?;
        if !self.is_in_progress() {
            return Err(MoveError::NotInProgress(self.phase));
        }
        if acting != self.current_turn {
            return Err(MoveError::WrongTurn {
                expected: self.current_turn,
                actual: acting,
            });
        }
        if !self.board.get(position).is_empty() {
            return Err(MoveError::Occupied(position.index()));
        }

        self.board.set(position, Cell::Marked(acting));
        let mut messages = vec![
            Message::move_echo(acting, position.index()),
            Message::update_board(&self.board),
        ];

        // A win on the last free cell is still a win
        let outcome = if !self.board.winning_lines(acting).is_empty() {
            Some(Outcome::Win(acting))
        } else if self.board.is_full() {
            Some(Outcome::Draw)
        } else {
            None
        };

        match outcome {
            Some(outcome) => {
                self.phase = Phase::Finished(outcome);
                messages.push(Message::game_over(outcome));
            }
            None => {
                self.current_turn = acting.other();
                messages.push(Message::update_turn(self.current_turn));
            }
        }
        Ok(messages)
    }
}
