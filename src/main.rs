use std::sync::Arc;

use saved_card_charge::adapters::http::checkout::{checkout_router, with_middleware};
use saved_card_charge::adapters::http::CheckoutAppState;
use saved_card_charge::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use saved_card_charge::application::WebhookVerification;
use saved_card_charge::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load and validate configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    config.validate()?;

    // Stripe client
    let stripe = StripePaymentAdapter::new(StripeConfig::from_payment_config(&config.payment))?;
    tracing::info!(
        test_mode = config.payment.is_test_mode(),
        api_version = config.payment.api_version().unwrap_or("account default"),
        "Stripe client ready"
    );

    let verification = WebhookVerification::from_secret(config.payment.webhook_secret());
    if !verification.is_signed() {
        tracing::warn!("No webhook signing secret configured; webhook signatures are not checked");
    }

    let static_dir = config.server.static_dir();
    if !static_dir.join("index.html").is_file() {
        tracing::warn!(static_dir = %static_dir.display(), "index.html not found in static directory");
    }

    let state = CheckoutAppState::new(
        Arc::new(stripe),
        verification,
        config.payment.stripe_publishable_key.clone(),
    );
    let app = with_middleware(
        checkout_router(&static_dir).with_state(state),
        config.server.request_timeout(),
    );

    // Start the server
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
