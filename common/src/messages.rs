use crate::tictactoe::{Board, Mark, Outcome};
use serde::{Deserialize, Serialize};

pub const LOBBY_FULL_NOTICE: &str = "The game lobby is full. You are now spectating.";
pub const GAME_STARTED_NOTICE: &str = "Game has started! It's X's turn.";
pub const NEW_ROUND_NOTICE: &str = "New game started! It's X's turn.";

// Position sent with messages that do not refer to a board cell
pub const NO_POSITION: i64 = -1;

// Every frame exchanged with clients. Frames are JSON objects tagged by
// their `type` field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Message {
    Chat {
        text: String,
        #[serde(
            default,
            rename = "userName",
            skip_serializing_if = "Option::is_none"
        )]
        sender_name: Option<String>,
    },
    Move {
        symbol: Mark,
        position: i64,
        // Only filled in on the server's echo of an accepted move
        #[serde(default, skip_serializing_if = "String::is_empty")]
        text: String,
    },
    AssignPlayer {
        #[serde(rename = "userName")]
        user_name: String,
        symbol: Mark,
    },
    LobbyFull {
        text: String,
        #[serde(rename = "userName")]
        user_name: String,
    },
    UpdateBoard {
        text: String,
    },
    UpdateTurn {
        text: String,
    },
    GameOver {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        symbol: Option<Mark>,
        position: i64,
    },
    System {
        text: String,
    },
}

impl Message {
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Chat { .. } => "chat",
            Message::Move { .. } => "move",
            Message::AssignPlayer { .. } => "assignPlayer",
            Message::LobbyFull { .. } => "lobbyFull",
            Message::UpdateBoard { .. } => "updateBoard",
            Message::UpdateTurn { .. } => "updateTurn",
            Message::GameOver { .. } => "gameOver",
            Message::System { .. } => "system",
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Message::System { text: text.into() }
    }

    pub fn update_board(board: &Board) -> Self {
        Message::UpdateBoard {
            text: board.to_string(),
        }
    }

    pub fn update_turn(mark: Mark) -> Self {
        Message::UpdateTurn {
            text: mark.to_string(),
        }
    }

    pub fn move_echo(mark: Mark, position: usize) -> Self {
        Message::Move {
            symbol: mark,
            // Board positions are always below 9
            position: position as i64,
            text: mark.to_string(),
        }
    }

    pub fn game_over(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win(mark) => Message::GameOver {
                text: format!("User-{} Wins!", mark),
                symbol: Some(mark),
                position: NO_POSITION,
            },
            Outcome::Draw => Message::GameOver {
                text: "It's a draw!".to_string(),
                symbol: None,
                position: NO_POSITION,
            },
        }
    }

    pub fn player_joined(user_name: &str) -> Self {
        Message::system(format!("{} has joined the game.", user_name))
    }

    pub fn spectator_joined(user_name: &str) -> Self {
        Message::system(format!("{} has joined as a spectator.", user_name))
    }
}
