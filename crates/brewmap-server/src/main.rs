#![forbid(unsafe_code)]

use brewmap_server::{
    build_router, validate_startup_config, AppState, ServerConfig, CONFIG_SCHEMA_VERSION,
};
use brewmap_store::{CafeStore, SqliteCafeStore};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                error!("failed to register unix signal handlers; falling back to ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn load_config() -> ServerConfig {
    let defaults = ServerConfig::default();
    ServerConfig {
        bind_addr: env::var("BREWMAP_BIND").unwrap_or(defaults.bind_addr),
        db_path: env::var("BREWMAP_DB_PATH").map_or(defaults.db_path, PathBuf::from),
        secret_key: env::var("BREWMAP_SECRET_KEY").unwrap_or_default(),
        csrf_ttl: Duration::from_secs(env_u64(
            "BREWMAP_CSRF_TTL_SECS",
            defaults.csrf_ttl.as_secs(),
        )),
        max_body_bytes: env_usize("BREWMAP_MAX_BODY_BYTES", defaults.max_body_bytes),
        allow_get_delete: env_bool("BREWMAP_ALLOW_GET_DELETE", defaults.allow_get_delete),
        enable_audit_log: env_bool("BREWMAP_AUDIT_LOG", defaults.enable_audit_log),
        log_json: env_bool("BREWMAP_LOG_JSON", defaults.log_json),
        shutdown_drain: env_duration_ms("BREWMAP_SHUTDOWN_DRAIN_MS", 2000),
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = load_config();
    init_tracing(config.log_json);
    validate_startup_config(&config)?;
    info!(
        config_schema_version = CONFIG_SCHEMA_VERSION,
        config = ?config,
        "startup config loaded"
    );

    let store = SqliteCafeStore::open(&config.db_path)
        .map_err(|e| format!("open store {}: {e}", config.db_path.display()))?;
    info!(
        backend = store.backend_tag(),
        db_path = %config.db_path.display(),
        "cafe store ready"
    );

    let bind_addr = config.bind_addr.clone();
    let drain = config.shutdown_drain;
    let state = AppState::new(Arc::new(store), config)?;
    let app = build_router(state);

    let listener = TcpListener::bind(bind_addr.as_str())
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!("brewmap-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            info!(drain_ms = drain.as_millis() as u64, "shutdown requested");
            tokio::time::sleep(drain).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
