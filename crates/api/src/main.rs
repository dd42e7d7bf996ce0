use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use pathway_core::otp::{OtpGenerator, RandomOtp, StaticOtp};
use pathway_core::scoring::RandomScoring;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use pathway_api::background::{aging_scan, notification_cleanup};
use pathway_api::bootstrap::ensure_super_admin;
use pathway_api::config::ServerConfig;
use pathway_api::engine::aging::ScanGuard;
use pathway_api::router::build_app_router;
use pathway_api::state::AppState;

const DEFAULT_LOG_FILTER: &str = "pathway_api=debug,pathway_db=info,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = config.port, "Configuration loaded");

    let pool = connect_database().await;

    let superadmin_password = std::env::var("SUPERADMIN_PASSWORD").ok();
    match ensure_super_admin(&pool, superadmin_password.as_deref()).await {
        Ok(true) => tracing::info!("Super admin account created"),
        Ok(false) => {}
        Err(e) => panic!("Super admin bootstrap failed: {e}"),
    }

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        scoring: Arc::new(RandomScoring),
        otp: otp_generator(&config),
        aging_guard: ScanGuard::default(),
    };

    let jobs_cancel = CancellationToken::new();
    let jobs = spawn_jobs(&state, jobs_cancel.clone());

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Cannot bind {addr}: {e}"));
    tracing::info!(%addr, "Listening");

    axum::serve(listener, build_app_router(state, &config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Stopping background jobs");
    jobs_cancel.cancel();
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(grace, join_jobs(jobs)).await.is_err() {
        tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "Background jobs did not stop in time"
        );
    }

    pool.close().await;
    tracing::info!("Shutdown complete");
}

/// `LOG_FORMAT=json` switches to JSON lines; `RUST_LOG` overrides the filter.
fn init_tracing() {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

/// Connect, verify and migrate. Any failure aborts startup.
async fn connect_database() -> pathway_db::DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = pathway_db::create_pool(&url)
        .await
        .unwrap_or_else(|e| panic!("Cannot connect to database: {e}"));
    pathway_db::health_check(&pool)
        .await
        .unwrap_or_else(|e| panic!("Database health check failed: {e}"));
    pathway_db::run_migrations(&pool)
        .await
        .unwrap_or_else(|e| panic!("Migrations failed: {e}"));
    tracing::info!("Database ready");
    pool
}

fn otp_generator(config: &ServerConfig) -> Arc<dyn OtpGenerator> {
    match &config.signup.otp_static_code {
        Some(code) => {
            tracing::warn!("OTP_STATIC_CODE is set, signup OTPs are fixed and echoed");
            Arc::new(StaticOtp(code.clone()))
        }
        None => Arc::new(RandomOtp),
    }
}

fn spawn_jobs(state: &AppState, cancel: CancellationToken) -> Vec<JoinHandle<()>> {
    let aging = &state.config.aging;
    let handles = vec![
        tokio::spawn(aging_scan::run(
            state.pool.clone(),
            state.aging_guard.clone(),
            aging.scan_interval_secs,
            cancel.clone(),
        )),
        tokio::spawn(notification_cleanup::run(
            state.pool.clone(),
            aging.clone(),
            cancel,
        )),
    ];
    tracing::info!(jobs = handles.len(), "Background jobs started");
    handles
}

async fn join_jobs(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Background job panicked");
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl-C handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT received"),
        () = terminate => tracing::info!("SIGTERM received"),
    }
}
