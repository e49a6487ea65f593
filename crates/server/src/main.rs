use certwatch::api::start_webserver;
use certwatch::config::load_config_or_panic;
use certwatch::schedule::spawn_scheduler;
use certwatch::service::CheckService;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing() {
    let default_directives = "certwatch=info,tower_http=info";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let layer = fmt::layer().with_target(true).with_level(true);

    tracing_subscriber::registry().with(env_filter).with(layer).init();
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    initialize_tracing();

    let config = Arc::new(load_config_or_panic());
    tracing::info!(
        name = "startup.config",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        targets = config.targets.len(),
        targets_file = ?config.targets_file,
        threshold_days = config.threshold_days,
        timeout_seconds = config.timeout_seconds,
        workers = config.workers,
        message = "Loaded configuration"
    );

    let service = Arc::new(CheckService::from_config(config.clone())?);

    let _scheduler = spawn_scheduler(service.clone(), config.schedule.clone());

    start_webserver(service, &config.bind_address).await?;
    Ok(())
}
