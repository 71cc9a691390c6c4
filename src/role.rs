use common::Mark;
use serde::Serialize;

pub const MAX_PLAYERS: usize = 2;

#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    Player,
    Spectator,
}

// What a connection was given when it joined the table.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Seat {
    pub role: Role,
    // Only players carry a symbol
    pub symbol: Option<Mark>,
    pub display_name: String,
    pub sequence_index: usize,
}

impl Seat {
    pub fn is_player(&self) -> bool {
        matches!(self.role, Role::Player)
    }

    // The second player fills the table and starts the game
    pub fn completes_table(&self) -> bool {
        self.is_player() && self.sequence_index == MAX_PLAYERS
    }
}

// Hands out seats in arrival order. Neither counter goes back down when a
// connection leaves, so a player slot is never handed out twice and
// spectator names are never reused.
#[derive(Debug, Default)]
pub struct RoleAssigner {
    players: usize,
    spectators: usize,
}

impl RoleAssigner {
    pub fn assign(&mut self) -> Seat {
        if self.players < MAX_PLAYERS {
            self.players += 1;
            let symbol = if self.players == 1 { Mark::X } else { Mark::O };
            Seat {
                role: Role::Player,
                symbol: Some(symbol),
                display_name: format!("player-{}", self.players),
                sequence_index: self.players,
            }
        } else {
            self.spectators += 1;
            Seat {
                role: Role::Spectator,
                symbol: None,
                display_name: format!("spectator-{}", self.spectators),
                sequence_index: self.spectators,
            }
        }
    }
}
