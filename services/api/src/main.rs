//! Logintemplate API server

use std::net::SocketAddr;
use std::sync::Arc;

use lt_api::metrics::setup_metrics;
use lt_api::{build_router, AppState, Config, DynBilling};
use lt_auth_core::{GoogleIdentityVerifier, HmacKey, SessionGate};
use lt_billing_core::{PayPalProvider, PaymentProvider};
use lt_db::pg::Repositories;
use lt_db::SubscriptionRepository;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("lt_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Logintemplate API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        http_port = config.http_port,
        google_auth = config.auth.google_auth_configured(),
        paypal = config.billing.is_configured(),
        paypal_env = config.billing.environment.as_str(),
        "Configuration loaded"
    );

    match config.auth.session_secret.as_deref() {
        None => tracing::error!("AUTH_SESSION_SECRET is not set; sign-in will fail"),
        Some(secret) if secret.len() < HmacKey::RECOMMENDED_KEY_LENGTH => {
            tracing::warn!("AUTH_SESSION_SECRET is shorter than recommended")
        }
        Some(_) => {}
    }

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Create database pool and schema
    let pool = lt_db::create_pool(&config.database_url).await?;
    lt_db::init_schema(&pool).await?;
    tracing::info!("Database pool created");

    // Create repositories and billing service
    let repos = Repositories::new(pool);
    let repo: Arc<dyn SubscriptionRepository> = Arc::new(repos.subscriptions);
    let provider: Arc<dyn PaymentProvider> = Arc::new(PayPalProvider::new(config.billing.clone()));
    let billing = DynBilling::new(repo, provider);

    // Session gate and identity verifier
    let gate = SessionGate::from_config(&config.auth);
    let identity = Arc::new(GoogleIdentityVerifier::new(&config.auth));

    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let state = AppState::new(gate, identity, billing, config);
    let app = build_router(state, metrics_handle);

    tracing::info!("HTTP server listening on {}", http_addr);
    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = ?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = ?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
