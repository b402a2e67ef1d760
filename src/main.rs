use ai_task_manager::{api, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ai_task_manager=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        working_dir = %config.working_dir.display(),
        model_dir = %config.model_dir.display(),
        "Starting AI task manager"
    );

    if let Err(e) = api::serve(config).await {
        tracing::error!("Server stopped: {:#}", e);
        return Err(e);
    }

    Ok(())
}
