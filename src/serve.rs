//! The web process: chart summaries of the training table and on-demand
//! classification of one query per request.
//!
//! | Route            | Response                                        |
//! |------------------|-------------------------------------------------|
//! | `GET /`          | genre and label bar charts ([`IndexView`])      |
//! | `GET /index`     | same as `/`                                     |
//! | `GET /go?query=` | the query and its label → 0/1 map ([`GoResponse`]) |

pub mod charts;
pub mod context;
pub mod error;
pub mod handlers;
pub mod routes;

pub use charts::{BarChart, IndexView};
pub use context::AppContext;
pub use handlers::{GoParams, GoResponse};
pub use routes::build_router;

use tokio::net::TcpListener;

use crate::config::ServeConfig;
use crate::error::Result;

/// Load the table and model, then serve until Ctrl-C.
pub async fn run(config: ServeConfig) -> Result<()> {
    let addr = config.socket_addr()?;
    let context = AppContext::load(&config)?;
    let app = build_router(context);

    let listener = TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
    }
}
