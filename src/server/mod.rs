mod docs;
mod dto;
mod error;
mod router;
mod routes;
mod state;
pub mod stream;

pub use error::ServerError;

use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::{EnvSnapshot, GatewayConfig};
use crate::model::ModelRegistry;

pub async fn serve(
    config: GatewayConfig,
    env: EnvSnapshot,
    registry: ModelRegistry,
    addr: SocketAddr,
) -> Result<(), ServerError> {
    let state = Arc::new(AppState::new(config, env, registry));
    router::serve(state, addr).await
}
