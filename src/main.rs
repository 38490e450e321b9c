use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use std::io;

use ledger_node::{NodeConfig, NodeState, api};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env();
    let host = config.host.clone();
    let port = config.port;

    println!(
        "⛓️ Starting ledger node at http://{host}:{port} (difficulty {})",
        config.difficulty
    );

    let state = NodeState::new(config).map_err(io::Error::other)?;
    let state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
