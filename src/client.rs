use crate::role::Seat;
use thiserror::Error;
use tokio::sync::mpsc;
use warp::ws::Message as WsMessage;

#[derive(Error, Debug)]
#[error("Error sending message")]
pub struct SendError;

pub type ConnId = String;

// Outbound half of a connection. Frames are queued here and written to the
// socket by that connection's forwarding task.
#[derive(Debug, Clone)]
pub struct Sender(pub mpsc::UnboundedSender<Result<WsMessage, warp::Error>>);

pub trait SendMsg {
    fn send(&self, msg: &str) -> Result<(), SendError>;
}

impl SendMsg for Sender {
    fn send(&self, msg: &str) -> Result<(), SendError> {
        self.0.send(Ok(WsMessage::text(msg))).map_err(|_| SendError)
    }
}

#[derive(Debug, Clone)]
pub struct Client<S> {
    pub id: ConnId,
    pub seat: Seat,
    pub sender: S,
}
