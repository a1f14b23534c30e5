//! HTTP server lifecycle

use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::Result;

/// Bind `bind_addr` and serve `app` until `shutdown` resolves
pub async fn serve<F>(app: Router, bind_addr: &str, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(bind_addr).await?;
    info!("Damage estimator listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Damage estimator stopped");
    Ok(())
}
