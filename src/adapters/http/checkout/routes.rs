//! Axum router configuration for checkout endpoints.
//!
//! Defines the route structure for the saved-card demo and the middleware
//! stack every request passes through.

use std::path::Path;
use std::time::Duration;

use axum::{routing::post, Router};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{charge_card_off_session, handle_webhook, CheckoutAppState};

/// Largest request body accepted on the API routes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the checkout API router.
///
/// # Routes
/// - `POST /charge-card-off-session` - Charge a saved card off-session
/// - `POST /webhook` - Receive Stripe events (signature verified when configured)
pub fn checkout_routes() -> Router<CheckoutAppState> {
    Router::new()
        .route("/charge-card-off-session", post(charge_card_off_session))
        .route("/webhook", post(handle_webhook))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

/// Create the complete checkout router.
///
/// API routes plus the static page: `GET /` serves `index.html` from
/// `static_dir`, and any other path falls through to the directory.
///
/// # Example
///
/// ```ignore
/// let app = checkout_router("public").with_state(state);
/// ```
pub fn checkout_router(static_dir: impl AsRef<Path>) -> Router<CheckoutAppState> {
    checkout_routes().fallback_service(ServeDir::new(static_dir.as_ref()))
}

/// Wrap a router in the request middleware stack.
///
/// Outermost first: request id assignment, tracing, timeout, and request id
/// propagation onto the response.
pub fn with_middleware(router: Router, request_timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(request_timeout))
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}
