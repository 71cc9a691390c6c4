use crate::client::{Client, ConnId, SendError, SendMsg};
use crate::registry::ConnectionRegistry;
use common::messages::Message;
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Error, Debug)]
pub enum HubError {
    #[error("Failed to serialize {kind} message: {source}")]
    Serialize {
        kind: &'static str,
        source: serde_json::Error,
    },
    #[error("Failed to deliver {kind} message to {id}")]
    Delivery {
        id: ConnId,
        kind: &'static str,
        source: SendError,
    },
}

fn encode(message: &Message) -> Result<String, HubError> {
    serde_json::to_string(message).map_err(|source| HubError::Serialize {
        kind: message.kind(),
        source,
    })
}

// Sends `message` to a single connection and reports whether it went out.
pub fn unicast<S: SendMsg>(client: &Client<S>, message: &Message) -> Result<(), HubError> {
    let payload = encode(message)?;
    client
        .sender
        .send(&payload)
        .map_err(|source| HubError::Delivery {
            id: client.id.clone(),
            kind: message.kind(),
            source,
        })
}

// Sends `message` to every registered connection. Connections that can no
// longer be written to are dropped from the registry; everybody else still
// gets the message. Returns the number of successful deliveries.
pub fn broadcast<S: SendMsg>(registry: &mut ConnectionRegistry<S>, message: &Message) -> usize {
    let payload = match encode(message) {
        Ok(payload) => payload,
        Err(err) => {
            error!("{}", err);
            return 0;
        }
    };
    debug!("broadcasting {} to {} connections", payload, registry.len());

    let mut delivered = 0;
    let mut failed = Vec::new();
    registry.for_each(|client| match client.sender.send(&payload) {
        Ok(()) => delivered += 1,
        Err(_) => failed.push(client.id.clone()),
    });

    for id in failed {
        warn!(
            "failed to deliver {} message to {}, dropping connection",
            message.kind(),
            id
        );
        registry.unregister(&id);
    }
    delivered
}
