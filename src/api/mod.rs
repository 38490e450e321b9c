mod chain;
mod health;
mod mining;
pub mod models;
mod peers;
mod tx;

use actix_web::web::{self, ServiceConfig};

/// Peers address each other by these exact paths, so they are mounted at the
/// root rather than under a versioned scope.
pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(chain::get_chain)
        .service(chain::validate_chain)
        .service(chain::add_block)
        .service(mining::mine)
        .service(
            web::resource("/create-transaction")
                .app_data(tx::json_config())
                .route(web::post().to(tx::create_transaction)),
        )
        .service(tx::get_pending)
        .service(peers::register_peer)
        .service(peers::sync_with_peer);
}
