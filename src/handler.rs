use crate::{client::Sender, server::GameServerHandle, ws};
use tracing::error;
use warp::{http::StatusCode, reply::json, Rejection, Reply};

type Result<T> = std::result::Result<T, Rejection>;

pub async fn ws_handler(ws: warp::ws::Ws, server: GameServerHandle<Sender>) -> Result<impl Reply> {
    Ok(ws.on_upgrade(move |socket| ws::client_connection(socket, server)))
}

pub async fn state_handler(server: GameServerHandle<Sender>) -> Result<Box<dyn Reply>> {
    match server.snapshot().await {
        Ok(snapshot) => Ok(Box::new(json(&snapshot))),
        Err(e) => {
            error!("could not read game state: {}", e);
            Ok(Box::new(StatusCode::SERVICE_UNAVAILABLE))
        }
    }
}

pub async fn health_handler() -> Result<impl Reply> {
    Ok(StatusCode::OK)
}
