pub mod config;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod services;

pub use config::{Config, ConfigError};
pub use observability::{init_observability, shutdown_observability, Metrics};

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Duration};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tower_sessions::{cookie::time, Expiry, SessionManagerLayer};

use crate::config::SessionConfig;
use crate::handlers::{
    about, cart_add, cart_index, cart_remove_all, cors_middleware, health_check, home,
    metrics_handler, product_create, product_create_form, product_index, product_show,
    request_validation_middleware, security_headers_middleware, AppState,
};
use crate::observability::{observability_middleware, BusinessTracingMiddleware};
use crate::repositories::{ExpiringMemoryStore, ProductCatalog};
use crate::services::{CartService, ProductService};

/// Build the full application router over the given catalog and session store
pub fn create_app(
    config: &Config,
    catalog: Arc<dyn ProductCatalog>,
    sessions: ExpiringMemoryStore,
    metrics: Arc<Metrics>,
) -> Router {
    let state = AppState {
        cart_service: Arc::new(CartService::new(catalog.clone())),
        product_service: Arc::new(ProductService::new(catalog)),
        business: Arc::new(BusinessTracingMiddleware::new(metrics.clone())),
        about: Arc::new(config.about.clone()),
    };

    let storefront = Router::new()
        .route("/", get(home))
        .route("/about/", get(about))
        .route("/products/", get(product_index))
        .route(
            "/products/create/",
            get(product_create_form).post(product_create),
        )
        .route("/products/:id/", get(product_show))
        .route("/cart/", get(cart_index))
        .route("/cart/add/:product_id/", post(cart_add))
        .route("/cart/removeAll/", post(cart_remove_all))
        .with_state(state)
        .layer(session_layer(&config.session, sessions));

    let operations = Router::new()
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics.clone());

    request_layers(
        Router::new().merge(storefront).merge(operations),
        config.server.max_request_size,
        config.server.request_timeout(),
        metrics,
    )
}

/// Wrap every route; the timeout sits inside the metrics layer so timed out requests are recorded
fn request_layers(
    router: Router,
    max_request_size: usize,
    request_timeout: Duration,
    metrics: Arc<Metrics>,
) -> Router {
    // Outermost layer last
    router
        .layer(DefaultBodyLimit::max(max_request_size))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(cors_middleware))
        .layer(middleware::from_fn(move |req, next| {
            request_validation_middleware(max_request_size, req, next)
        }))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics.clone(), req, next)
        }))
        .layer(TraceLayer::new_for_http())
}

/// Cookie-backed sessions kept in process memory
fn session_layer(
    config: &SessionConfig,
    sessions: ExpiringMemoryStore,
) -> SessionManagerLayer<ExpiringMemoryStore> {
    SessionManagerLayer::new(sessions)
        .with_name(config.cookie_name.clone())
        .with_secure(config.secure_cookie)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(
            config.expiry_seconds,
        )))
}
