use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const BOARD_SIZE: usize = 9;

// Rows, then columns, then the two diagonals
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Error, Debug, PartialEq)]
pub enum BoardPositionError {
    #[error("Position {0} is outside of the board (0-8)")]
    OutOfRange(i64),
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Marked(Mark),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_mark(&self, mark: Mark) -> bool {
        matches!(self, Cell::Marked(m) if *m == mark)
    }
}

// A board index that is known to be in range
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoardPosition(usize);

impl BoardPosition {
    pub fn new(position: i64) -> Result<Self, BoardPositionError> {
        usize::try_from(position)
            .ok()
            .filter(|p| *p < BOARD_SIZE)
            .map(BoardPosition)
            .ok_or(BoardPositionError::OutOfRange(position))
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Board([Cell; BOARD_SIZE]);

impl Board {
    pub fn get(&self, position: BoardPosition) -> Cell {
        self.0[position.index()]
    }

    pub(crate) fn set(&mut self, position: BoardPosition, cell: Cell) {
        self.0[position.index()] = cell;
    }

    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.0
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(|c| !c.is_empty())
    }

    // Every win line completely occupied by `mark`.
    pub fn winning_lines(&self, mark: Mark) -> Vec<[usize; 3]> {
        WIN_LINES
            .iter()
            .filter(|line| line.iter().all(|&i| self.0[i].is_mark(mark)))
            .copied()
            .collect()
    }
}

// Clients expect the board as a bracketed, space separated list of cells
// where empty cells are rendered as empty strings.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self
            .0
            .iter()
            .map(|cell| match cell {
                Cell::Empty => String::new(),
                Cell::Marked(mark) => mark.to_string(),
            })
            .collect::<Vec<String>>()
            .join(" ");
        write!(f, "[{}]", cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(marks: &[(usize, Mark)]) -> Board {
        let mut board = Board::default();
        for &(i, mark) in marks {
            board.set(BoardPosition::new(i as i64).unwrap(), Cell::Marked(mark));
        }
        board
    }

    #[test]
    fn test_board_position_bounds() {
        assert_eq!(BoardPosition::new(0).unwrap().index(), 0);
        assert_eq!(BoardPosition::new(8).unwrap().index(), 8);
        assert_eq!(
            BoardPosition::new(9),
            Err(BoardPositionError::OutOfRange(9))
        );
        assert_eq!(
            BoardPosition::new(-1),
            Err(BoardPositionError::OutOfRange(-1))
        );
        assert_eq!(
            BoardPosition::new(4_294_967_296),
            Err(BoardPositionError::OutOfRange(4_294_967_296))
        );
    }

    #[test]
    fn test_every_win_line() {
        for mark in [Mark::X, Mark::O] {
            for line in WIN_LINES {
                let marks: Vec<(usize, Mark)> = line.iter().map(|&i| (i, mark)).collect();
                let board = board_from(&marks);
                assert_eq!(board.winning_lines(mark), vec![line]);
                assert!(board.winning_lines(mark.other()).is_empty());
            }
        }
    }

    #[test]
    fn test_two_lines_at_once() {
        let board = board_from(&[
            (0, Mark::X),
            (1, Mark::X),
            (2, Mark::X),
            (3, Mark::X),
            (6, Mark::X),
        ]);
        assert_eq!(board.winning_lines(Mark::X), vec![[0, 1, 2], [0, 3, 6]]);
    }

    #[test]
    fn test_is_full() {
        let mut board = Board::default();
        assert!(!board.is_full());
        for i in 0..BOARD_SIZE {
            let mark = if i % 2 == 0 { Mark::X } else { Mark::O };
            board.set(BoardPosition::new(i as i64).unwrap(), Cell::Marked(mark));
        }
        assert!(board.is_full());
    }

    #[test]
    fn test_display() {
        assert_eq!(Board::default().to_string(), "[        ]");
        let board = board_from(&[(0, Mark::X), (4, Mark::O), (8, Mark::X)]);
        assert_eq!(board.to_string(), "[X    O    X]");
    }
}
