use crate::client::{ConnId, SendMsg};
use crate::hub::{self, HubError};
use crate::registry::ConnectionRegistry;
use crate::role::{Seat, MAX_PLAYERS};
use common::messages::{Message, GAME_STARTED_NOTICE, LOBBY_FULL_NOTICE, NEW_ROUND_NOTICE};
use common::{GameState, Mark, MoveError, Phase};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, trace, warn};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Game server is no longer running")]
    Stopped,
    #[error("Connection {0} is not registered")]
    UnknownConnection(ConnId),
    #[error("{0} is spectating and cannot move")]
    Spectator(String),
    #[error("Rejected move: {0}")]
    Move(#[from] MoveError),
    #[error(transparent)]
    Hub(#[from] HubError),
}

type Reply<T> = oneshot::Sender<Result<T, ServerError>>;

// Requests handled by the `GameServer`, one at a time and in the order
// they were sent.
pub enum Command<S> {
    Connect {
        sender: S,
        res_tx: Reply<(ConnId, Seat)>,
    },
    Chat {
        conn: ConnId,
        text: String,
        sender_name: Option<String>,
        res_tx: Reply<()>,
    },
    Move {
        conn: ConnId,
        position: i64,
        // Whatever symbol the client put in the message
        claimed: Mark,
        res_tx: Reply<()>,
    },
    Disconnect {
        conn: ConnId,
        res_tx: Reply<()>,
    },
    Snapshot {
        res_tx: Reply<Snapshot>,
    },
}

impl<S> Command<S> {
    fn name(&self) -> &'static str {
        match self {
            Command::Connect { .. } => "connect",
            Command::Chat { .. } => "chat",
            Command::Move { .. } => "move",
            Command::Disconnect { .. } => "disconnect",
            Command::Snapshot { .. } => "snapshot",
        }
    }
}

// Point-in-time view of the table.
#[derive(Serialize, Clone, Debug)]
pub struct Snapshot {
    pub game: GameState,
    pub board: String,
    pub players: usize,
    pub spectators: usize,
}

// Owns the one game table and every connection sitting at it.
// All moves and registrations go through the command queue, so the board
// only ever changes from this task and every broadcast caused by a command
// has been queued on each connection before the next command is looked at.
pub struct GameServer<S> {
    game: GameState,
    registry: ConnectionRegistry<S>,
    cmd_rx: mpsc::UnboundedReceiver<Command<S>>,
}

impl<S: SendMsg> GameServer<S> {
    pub fn new() -> (Self, GameServerHandle<S>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        (
            GameServer {
                game: GameState::default(),
                registry: ConnectionRegistry::default(),
                cmd_rx,
            },
            GameServerHandle { cmd_tx },
        )
    }

    pub async fn run(mut self) {
        info!("game server started");
        while let Some(cmd) = self.cmd_rx.recv().await {
            self.process_command(cmd);
        }
        info!("game server stopped");
    }

    fn process_command(&mut self, cmd: Command<S>) {
        let name = cmd.name();
        // A caller that went away before its reply is of no concern here
        match cmd {
            Command::Connect { sender, res_tx } => {
                let _ = res_tx.send(self.connect(sender));
            }
            Command::Chat {
                conn,
                text,
                sender_name,
                res_tx,
            } => {
                let _ = res_tx.send(self.chat(&conn, text, sender_name));
            }
            Command::Move {
                conn,
                position,
                claimed,
                res_tx,
            } => {
                let _ = res_tx.send(self.play(&conn, position, claimed));
            }
            Command::Disconnect { conn, res_tx } => {
                self.registry.unregister(&conn);
                let _ = res_tx.send(Ok(()));
            }
            Command::Snapshot { res_tx } => {
                let _ = res_tx.send(Ok(self.snapshot()));
            }
        }
        trace!("finished processing {} command", name);
    }

    fn unicast(&mut self, id: &str, message: &Message) -> Result<(), ServerError> {
        let client = self
            .registry
            .get(id)
            .ok_or_else(|| ServerError::UnknownConnection(id.to_string()))?;
        if let Err(err) = hub::unicast(client, message) {
            self.registry.unregister(id);
            return Err(err.into());
        }
        Ok(())
    }

    fn broadcast(&mut self, message: &Message) {
        hub::broadcast(&mut self.registry, message);
    }

    fn connect(&mut self, sender: S) -> Result<(ConnId, Seat), ServerError> {
        let (id, seat) = self.registry.register(sender);

        let (greeting, joined) = match seat.symbol {
            Some(symbol) => (
                Message::AssignPlayer {
                    user_name: seat.display_name.clone(),
                    symbol,
                },
                Message::player_joined(&seat.display_name),
            ),
            None => (
                Message::LobbyFull {
                    text: LOBBY_FULL_NOTICE.to_string(),
                    user_name: seat.display_name.clone(),
                },
                Message::spectator_joined(&seat.display_name),
            ),
        };
        let greeted = self.unicast(&id, &greeting);
        if greeted.is_ok() {
            self.broadcast(&joined);
        }

        // The second seat is spent even if its greeting never arrived, so the
        // game starts either way
        if seat.completes_table() && self.game.start() {
            info!("both players seated, starting game");
            self.broadcast(&Message::system(GAME_STARTED_NOTICE));
            self.broadcast(&Message::update_turn(self.game.current_turn()));
        }
        greeted?;

        let board = Message::update_board(self.game.board());
        self.unicast(&id, &board)?;
        // Whoever completed the table already heard the turn in the broadcast
        if self.game.is_in_progress() && !seat.completes_table() {
            self.unicast(&id, &Message::update_turn(self.game.current_turn()))?;
        }
        Ok((id, seat))
    }

    fn chat(
        &mut self,
        id: &str,
        text: String,
        sender_name: Option<String>,
    ) -> Result<(), ServerError> {
        let client = self
            .registry
            .get(id)
            .ok_or_else(|| ServerError::UnknownConnection(id.to_string()))?;
        let sender_name = sender_name.or_else(|| Some(client.seat.display_name.clone()));
        self.broadcast(&Message::Chat { text, sender_name });
        Ok(())
    }

    fn play(&mut self, id: &str, position: i64, claimed: Mark) -> Result<(), ServerError> {
        let client = self
            .registry
            .get(id)
            .ok_or_else(|| ServerError::UnknownConnection(id.to_string()))?;
        let symbol = match client.seat.symbol {
            Some(symbol) => symbol,
            None => return Err(ServerError::Spectator(client.seat.display_name.clone())),
        };
        if claimed != symbol {
            warn!(
                "{} claimed to play {} but is seated as {}",
                client.seat.display_name, claimed, symbol
            );
        }

        let messages = self.game.apply_move(position, symbol)?;
        for message in &messages {
            self.broadcast(message);
        }
        if let Phase::Finished(outcome) = self.game.phase() {
            info!("game finished: {:?}", outcome);
            self.next_round();
        }
        Ok(())
    }

    // Clears the table after a finished game and deals a new one when both
    // players are still around to play it
    fn next_round(&mut self) {
        self.game.reset();
        self.broadcast(&Message::update_board(self.game.board()));
        if self.registry.players().len() == MAX_PLAYERS && self.game.start() {
            self.broadcast(&Message::system(NEW_ROUND_NOTICE));
            self.broadcast(&Message::update_turn(self.game.current_turn()));
        } else {
            info!("waiting for players before the next game");
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            game: self.game.clone(),
            board: self.game.board().to_string(),
            players: self.registry.players().len(),
            spectators: self.registry.spectator_count(),
        }
    }
}

// Cloneable handle used by sessions and HTTP handlers to talk to the
// `GameServer`.
pub struct GameServerHandle<S> {
    cmd_tx: mpsc::UnboundedSender<Command<S>>,
}

impl<S> Clone for GameServerHandle<S> {
    fn clone(&self) -> Self {
        GameServerHandle {
            cmd_tx: self.cmd_tx.clone(),
        }
    }
}

impl<S> GameServerHandle<S> {
    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> Command<S>,
    ) -> Result<T, ServerError> {
        let (res_tx, res_rx) = oneshot::channel();
        self.cmd_tx
            .send(command(res_tx))
            .map_err(|_| ServerError::Stopped)?;
        res_rx.await.map_err(|_| ServerError::Stopped)?
    }

    pub async fn connect(&self, sender: S) -> Result<(ConnId, Seat), ServerError> {
        self.request(|res_tx| Command::Connect { sender, res_tx })
            .await
    }

    pub async fn chat(
        &self,
        conn: &str,
        text: String,
        sender_name: Option<String>,
    ) -> Result<(), ServerError> {
        self.request(|res_tx| Command::Chat {
            conn: conn.to_string(),
            text,
            sender_name,
            res_tx,
        })
        .await
    }

    pub async fn play(&self, conn: &str, position: i64, claimed: Mark) -> Result<(), ServerError> {
        self.request(|res_tx| Command::Move {
            conn: conn.to_string(),
            position,
            claimed,
            res_tx,
        })
        .await
    }

    pub async fn disconnect(&self, conn: &str) -> Result<(), ServerError> {
        self.request(|res_tx| Command::Disconnect {
            conn: conn.to_string(),
            res_tx,
        })
        .await
    }

    pub async fn snapshot(&self) -> Result<Snapshot, ServerError> {
        self.request(|res_tx| Command::Snapshot { res_tx }).await
    }
}
