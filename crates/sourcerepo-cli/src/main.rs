//! Sourcerepo binary.

use anyhow::Context;
use sourcerepo_cli::{Settings, reconcile};
use sourcerepo_git::{Bootstrapper, Libgit2Engine};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the JSON result
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::load().context("Failed to load settings")?;

    tracing::info!("Starting sourcerepo v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Repository: {}", settings.repo.endpoint());
    if let Some(timeout) = settings.timeout() {
        tracing::info!("Deadline: {}s", timeout.as_secs());
    }

    let engine = Libgit2Engine::new(settings.engine.to_engine_config());
    let bootstrapper = Bootstrapper::new(engine);

    let result = match reconcile(bootstrapper, settings.repo.clone(), settings.timeout()).await {
        Ok(result) => result,
        Err(e) if e.leaves_task_running() => {
            tracing::error!("{}", e);
            // The timed-out blocking task would otherwise hold the runtime open
            std::process::exit(1);
        },
        Err(e) => return Err(anyhow::Error::new(e).context("Reconciliation failed")),
    };

    println!("{}", serde_json::to_string(&result)?);

    Ok(())
}
