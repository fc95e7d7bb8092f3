use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::catalog::SnapshotStore;
use crate::cli::args::ServeArgs;
use crate::config::{Config, Paths};
use crate::error::Result;
use crate::feed::FeedSource;
use crate::query::QueryService;
use crate::refresh::RefreshLoop;
use crate::server::{self, AppState};

/// Run the HTTP API until Ctrl-C
pub async fn serve(config: &Config, paths: &Paths, args: &ServeArgs) -> Result<String> {
    let mut config = config.clone();
    if let Some(interval) = args.interval {
        config.refresh.interval_secs = interval;
    }
    if let Some(source) = args.source {
        config.refresh.source = source;
    }
    let bind = args
        .bind
        .clone()
        .unwrap_or_else(|| config.server.bind.clone());

    let interval = config.refresh_interval()?;
    let settings = config.query_settings()?;
    let source = FeedSource::from_config(&config, paths)?;

    let store = Arc::new(SnapshotStore::new());
    let mut refresh = RefreshLoop::new(source, Arc::clone(&store))
        .with_interval(interval)
        .with_timeout(config.fetch_timeout()?);

    if args.strict_startup {
        refresh.refresh_once().await?;
        refresh = refresh.with_initial_delay(interval);
    }

    let listener = TcpListener::bind(&bind).await?;

    let shutdown = CancellationToken::new();
    let refresh = refresh.spawn(shutdown.child_token());
    spawn_ctrl_c(shutdown.clone());

    let queries = Arc::new(QueryService::new(store, settings));
    let served = server::serve(listener, AppState::new(queries, config.search.limit), shutdown.clone()).await;

    shutdown.cancel();
    refresh.join().await;
    served?;

    Ok(String::new())
}

fn spawn_ctrl_c(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received Ctrl-C, shutting down");
                shutdown.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "Unable to listen for Ctrl-C"),
        }
    });
}
