//! netwatch: continuous LAN device discovery, fingerprinting, and alerting.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use clap::Parser;
use netwatch::api;
use netwatch::config::Config;
use netwatch::store;
use netwatch::supervisor::Supervisor;

/// netwatch network observability service.
#[derive(Parser, Debug)]
#[command(name = "netwatch")]
#[command(about = "Home/small-office network observability service", long_about = None)]
struct Args {
    /// Path to the JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reset configuration to first-run defaults and exit.
    #[arg(long)]
    reset: bool,

    /// Run the interactive console setup wizard, even if already configured.
    #[arg(long)]
    console_setup: bool,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(Config::default_path);

    if args.reset {
        match Config::reset(&config_path) {
            Ok(_) => log::info!("configuration reset to defaults at {}", config_path.display()),
            Err(err) => {
                eprintln!("failed to reset configuration: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(err) = run(config_path, args.console_setup).await {
        eprintln!("netwatch exited with an error: {err}");
        std::process::exit(1);
    }
}

async fn run(config_path: PathBuf, force_console_setup: bool) -> netwatch::error::Result<()> {
    let mut config = Config::load(&config_path)?;
    if force_console_setup || !config.general.configured {
        config = netwatch::setup::run(config)?;
    }
    let db_path = config_path
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."))
        .join("netwatch.db");

    let pool = store::open(&db_path)?;
    let supervisor = Arc::new(Supervisor::new(pool.clone()));
    supervisor.start_all(&config);

    let shared_config = Arc::new(RwLock::new(config.clone()));

    if config.web_interface.enabled {
        let state = api::AppState {
            pool,
            db_path: db_path.clone(),
            config: shared_config.clone(),
        };
        let router = api::build_router(state);
        let addr = format!("{}:{}", config.web_interface.host, config.web_interface.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        log::info!("control API listening on {addr}");
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, router).await {
                log::error!("control API server stopped: {err}");
            }
        });
    }

    run_until_shutdown(&supervisor, &shared_config).await;
    log::info!("shutdown signal received, stopping components");
    supervisor.shutdown().await;
    Ok(())
}

/// Waits for either a shutdown signal or (on Unix) SIGHUP, reloading and
/// reconciling against the config file on every SIGHUP rather than exiting.
async fn run_until_shutdown(supervisor: &Arc<Supervisor>, shared_config: &Arc<RwLock<Config>>) {
    #[cfg(unix)]
    {
        let mut hangup = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup())
            .expect("failed to install SIGHUP handler");
        let mut terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => return,
                _ = terminate.recv() => return,
                _ = hangup.recv() => {
                    let previous = shared_config.read().unwrap().clone();
                    let mut config = shared_config.write().unwrap();
                    if let Err(err) = config.reload() {
                        log::error!("config reload failed: {err}");
                        continue;
                    }
                    let current = config.clone();
                    drop(config);
                    log::info!("config reloaded, reconciling running components");
                    supervisor.reconcile(&previous, &current).await;
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = shared_config;
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    }
}
