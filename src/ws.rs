use crate::client::{SendMsg, Sender};
use crate::server::{GameServerHandle, ServerError};
use common::messages::Message;
use futures::{FutureExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{error, info, warn};
use warp::ws::{Message as WsMessage, WebSocket};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Binary frames are not part of the protocol")]
    Binary,
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, PartialEq)]
enum Frame {
    Message(Message),
    // Keepalives carry nothing for the game
    Control,
    Close,
}

fn decode(msg: &WsMessage) -> Result<Frame, DecodeError> {
    if msg.is_close() {
        return Ok(Frame::Close);
    }
    if msg.is_ping() || msg.is_pong() {
        return Ok(Frame::Control);
    }
    let text = msg.to_str().map_err(|_| DecodeError::Binary)?.trim();
    if text == "ping" {
        return Ok(Frame::Control);
    }
    Ok(Frame::Message(serde_json::from_str(text)?))
}

pub async fn client_connection(ws: WebSocket, server: GameServerHandle<Sender>) {
    let (client_ws_sender, mut client_ws_rcv) = ws.split();
    let (client_sender, client_rcv) = mpsc::unbounded_channel();

    let client_rcv = UnboundedReceiverStream::new(client_rcv);
    tokio::task::spawn(client_rcv.forward(client_ws_sender).map(|result| {
        if let Err(e) = result {
            error!("error sending websocket msg: {}", e);
        }
    }));

    let (id, seat) = match server.connect(Sender(client_sender)).await {
        Ok(assigned) => assigned,
        Err(e) => {
            error!("could not seat new connection: {}", e);
            return;
        }
    };
    info!("{} connected as {}", id, seat.display_name);

    while let Some(result) = client_ws_rcv.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                error!("error receiving ws message for id: {}: {}", id, e);
                break;
            }
        };
        let message = match decode(&msg) {
            Ok(Frame::Message(message)) => message,
            Ok(Frame::Control) => continue,
            Ok(Frame::Close) => break,
            Err(e) => {
                warn!("closing {} after protocol violation: {}", id, e);
                break;
            }
        };
        if let Err(e) = client_msg(&id, message, &server).await {
            warn!("ending session {}: {}", id, e);
            break;
        }
    }

    if let Err(e) = server.disconnect(&id).await {
        error!("failed to unregister {}: {}", id, e);
    }
    info!("{} disconnected", id);
}

// Errors returned from here end the session
#[tracing::instrument(skip(server))]
async fn client_msg<S: SendMsg>(
    id: &str,
    message: Message,
    server: &GameServerHandle<S>,
) -> Result<(), ServerError> {
    info!("received {} message from {}", message.kind(), id);
    let result = match message {
        Message::Chat { text, sender_name } => server.chat(id, text, sender_name).await,
        Message::Move {
            symbol, position, ..
        } => server.play(id, position, symbol).await,
        other => {
            warn!("ignoring {} message from client {}", other.kind(), id);
            Ok(())
        }
    };
    match result {
        Err(ServerError::Move(e)) => {
            warn!("rejected move from {}: {}", id, e);
            Ok(())
        }
        Err(ServerError::Spectator(name)) => {
            warn!("ignoring move from spectator {}", name);
            Ok(())
        }
        other => other,
    }
}
