use mimalloc::MiMalloc;
use std::time::Duration;
use storegate::db::MySqlGate;
use storegate::service::orchestrator::Orchestrator;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cfg = &storegate::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database = %cfg.database_name(),
        host = %cfg.database_url.host_str().unwrap_or("<none>"),
        script = ?cfg.script,
        loglevel = %cfg.loglevel,
    );

    let handoff: Vec<String> = std::env::args().skip(1).collect();

    let child_env = vec![(
        "DATABASE_URL".to_string(),
        cfg.script_database_url().to_string(),
    )];

    let orchestrator = Orchestrator::new(MySqlGate::from_config(cfg), cfg.script.clone())
        .with_probe_budget(
            Duration::from_secs(cfg.probe_interval_secs),
            cfg.probe_max_attempts,
        )
        .with_server_command(cfg.mysqld.clone())
        .with_child_env(child_env)
        .with_handoff(handoff);

    match orchestrator.run().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            error!(error = %err, "startup orchestration failed");
            std::process::exit(1);
        }
    }
}
