use crate::client::Sender;
use crate::config::Config;
use crate::server::{GameServer, GameServerHandle};
use std::convert::Infallible;
use std::error::Error;
use tracing::info;
use warp::{
    http::{header, Method},
    Filter,
};

mod client;
mod config;
mod handler;
mod hub;
mod registry;
mod role;
mod server;
#[cfg(test)]
mod test_util;
mod ws;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, &config.log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(non_blocking)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let (game_server, server) = GameServer::<Sender>::new();
    tokio::spawn(game_server.run());
    info!("created game server, listening on {}", config.addr);

    let health_route = warp::path!("health").and_then(handler::health_handler);

    let state_route = warp::path!("state")
        .and(warp::get())
        .and(with_server(server.clone()))
        .and_then(handler::state_handler);

    let ws_route = warp::path("ws")
        .and(warp::ws())
        .and(with_server(server.clone()))
        .and_then(handler::ws_handler);

    let routes = health_route.or(state_route).or(ws_route).with(
        warp::cors()
            .allow_methods(&[Method::OPTIONS, Method::GET])
            .allow_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .max_age(300)
            .allow_any_origin(),
    );

    warp::serve(routes).run(config.addr).await;
    Ok(())
}

fn with_server(
    server: GameServerHandle<Sender>,
) -> impl Filter<Extract = (GameServerHandle<Sender>,), Error = Infallible> + Clone {
    warp::any().map(move || server.clone())
}
