pub mod cart;
pub mod health;
pub mod metrics;
pub mod middleware;
pub mod pages;
pub mod products;

pub use cart::*;
pub use health::*;
pub use metrics::*;
pub use middleware::*;
pub use pages::*;
pub use products::*;

use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::AboutConfig;
use crate::models::{RepositoryError, ServiceError};
use crate::observability::BusinessTracingMiddleware;
use crate::services::{CartService, ProductService};

/// Shared state for the storefront routes
#[derive(Clone)]
pub struct AppState {
    pub cart_service: Arc<CartService>,
    pub product_service: Arc<ProductService>,
    pub business: Arc<BusinessTracingMiddleware>,
    pub about: Arc<AboutConfig>,
}

/// Catalog outcomes that reflect bad input rather than a broken backend
pub(crate) fn is_catalog_failure(err: &ServiceError) -> bool {
    !matches!(
        err,
        ServiceError::ProductNotFound { .. }
            | ServiceError::InvalidProductId { .. }
            | ServiceError::InvalidForm { .. }
            | ServiceError::ValidationError { .. }
    )
}

/// Convert ServiceError to HTTP response
pub(crate) fn service_error_to_response(err: ServiceError) -> (StatusCode, Json<Value>) {
    let (status, message) = match err {
        ServiceError::ProductNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::InvalidProductId { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        ServiceError::ValidationError { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        ServiceError::InvalidForm { .. } => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        ServiceError::Session { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Session storage error".to_string(),
        ),
        ServiceError::Repository { source } => match source {
            RepositoryError::Conflict { .. } => (
                StatusCode::CONFLICT,
                "Resource already exists".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        },
    };

    (
        status,
        Json(json!({
            "error": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::Body,
        http::{header, HeaderMap, Request, StatusCode},
        Router,
    };
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::models::{Product, ProductId};
    use crate::observability::Metrics;
    use crate::repositories::{ExpiringMemoryStore, InMemoryProductCatalog};

    /// Full router over the two-product catalog {121: Tv samsung, 11: Iphone}
    pub fn test_app() -> Router {
        let catalog = InMemoryProductCatalog::with_products(vec![
            Product::new(ProductId::from(121), "Tv samsung", dec!(1000)).unwrap(),
            Product::new(ProductId::from(11), "Iphone", dec!(2000)).unwrap(),
        ]);
        crate::create_app(
            &Config::default(),
            Arc::new(catalog),
            ExpiringMemoryStore::new(),
            Arc::new(Metrics::new().unwrap()),
        )
    }

    pub fn get(uri: &str) -> Request<Body> {
        get_with_cookie(uri, None)
    }

    pub fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    pub fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Run one request; the body is parsed as JSON or `Value::Null` when empty or not JSON
    pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value, HeaderMap) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body, headers)
    }

    /// `name=value` pair of the session cookie set by a response
    pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with("storefront_session="))
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormErrors;

    #[test]
    fn test_service_error_status_mapping() {
        let cases = vec![
            (
                ServiceError::ProductNotFound { id: "42".to_string() },
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::InvalidForm {
                    errors: FormErrors::new(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ServiceError::Session {
                    message: "store down".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServiceError::Repository {
                    source: RepositoryError::SessionBackend {
                        message: "boom".to_string(),
                    },
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let (status, body) = service_error_to_response(err);
            assert_eq!(status, expected);
            assert!(body.0.get("error").is_some());
            assert!(body.0.get("timestamp").is_some());
        }
    }

    #[test]
    fn test_backend_details_are_not_leaked() {
        let (_, body) = service_error_to_response(ServiceError::Session {
            message: "redis://secret-host failed".to_string(),
        });
        assert_eq!(body.0["error"], "Session storage error");
    }

    #[test]
    fn test_catalog_failure_classification() {
        assert!(!is_catalog_failure(&ServiceError::ProductNotFound {
            id: "1".to_string()
        }));
        assert!(!is_catalog_failure(&ServiceError::InvalidForm {
            errors: FormErrors::new()
        }));
        assert!(is_catalog_failure(&ServiceError::Repository {
            source: RepositoryError::SessionBackend {
                message: "down".to_string()
            }
        }));
    }
}
