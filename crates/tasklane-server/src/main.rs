//! tasklane-server: serves a tasklane repository over HTTP.
//!
//! Run from inside a directory initialized with `tasklane init`. The bind
//! address comes from `TASKLANE_BIND`, then the `server.bind` setting.

use anyhow::Context;
use tasklane::app::App;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("tasklane=info,tasklane_server=info,tower_http=info")
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let app = App::from_directory(&current_dir).await?;
    let (store, config) = app.into_parts();
    let bind = config.server.bind_address();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting tasklane-server");
    tasklane_server::serve(store, &bind).await
}
