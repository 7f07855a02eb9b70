use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use opentelemetry::trace::TraceContextExt;
use std::{future::Future, sync::Arc, time::Instant};
use tracing::{error, info, instrument, warn, Instrument};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::Metrics;

/// Holds one in-flight slot; released on drop so cancelled requests are not counted forever
struct InFlightGuard<'a> {
    metrics: &'a Metrics,
    method: &'a str,
    endpoint: &'a str,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(metrics: &'a Metrics, method: &'a str, endpoint: &'a str) -> Self {
        metrics.increment_in_flight(method, endpoint);
        Self {
            metrics,
            method,
            endpoint,
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.metrics.decrement_in_flight(self.method, self.endpoint);
    }
}

/// Middleware for automatic request tracing and metrics collection
pub async fn observability_middleware(
    metrics: Arc<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let uri = request.uri().to_string();

    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    // First hop of X-Forwarded-For, then X-Real-IP
    let client_ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .or_else(|| {
            request
                .headers()
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
        })
        .unwrap_or("unknown")
        .trim()
        .to_string();

    // Group by route template so product ids don't explode label cardinality
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched_path| matched_path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let span_name = format!("{} {}", method, endpoint);

    let span = tracing::info_span!(
        target: "storefront_rs::http",
        "{}", span_name,
        otel.name = %span_name,
        otel.kind = "server",
        http.method = %method,
        http.route = %endpoint,
        http.url = %uri,
        http.user_agent = %user_agent,
        http.client_ip = %client_ip,
        http.status_code = tracing::field::Empty,
        http.response_time_ms = tracing::field::Empty,
    );

    async {
        let in_flight = InFlightGuard::acquire(&metrics, &method, &endpoint);

        let trace_id = tracing::Span::current()
            .context()
            .span()
            .span_context()
            .trace_id()
            .to_string();

        info!(trace_id = %trace_id, method = %method, path = %endpoint, "Processing request");

        let response = next.run(request).await;

        let duration = start_time.elapsed();
        let duration_ms = duration.as_millis();
        let status_code = response.status().as_u16();

        tracing::Span::current().record("http.status_code", status_code);
        tracing::Span::current().record("http.response_time_ms", duration_ms);

        let current_span = tracing::Span::current();
        let span_context = current_span.context();
        let otel_span = span_context.span();
        if status_code >= 500 {
            otel_span.set_status(opentelemetry::trace::Status::error("HTTP error"));
        } else {
            otel_span.set_status(opentelemetry::trace::Status::Ok);
        }

        metrics.record_http_request(&method, &endpoint, status_code, duration.as_secs_f64());
        drop(in_flight);

        if status_code >= 500 {
            error!(
                trace_id = %trace_id,
                method = %method,
                path = %endpoint,
                status_code = status_code,
                duration_ms = duration_ms,
                client_ip = %client_ip,
                "Request failed"
            );
        } else if status_code >= 400 {
            warn!(
                trace_id = %trace_id,
                method = %method,
                path = %endpoint,
                status_code = status_code,
                duration_ms = duration_ms,
                client_ip = %client_ip,
                "Request rejected"
            );
        } else {
            info!(
                trace_id = %trace_id,
                method = %method,
                path = %endpoint,
                status_code = status_code,
                duration_ms = duration_ms,
                "Request completed successfully"
            );
        }

        response
    }
    .instrument(span)
    .await
}

/// Wraps cart and catalog operations with timing, logging and business metrics
pub struct BusinessTracingMiddleware {
    metrics: Arc<Metrics>,
}

impl BusinessTracingMiddleware {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }

    /// Trace a cart operation
    #[instrument(skip_all, fields(operation = %operation))]
    pub async fn trace_cart_operation<F, T, E>(&self, operation: &str, future: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let start_time = Instant::now();
        let result = future.await;
        let duration = start_time.elapsed();

        match &result {
            Ok(_) => {
                info!(
                    duration_ms = duration.as_millis(),
                    "Cart operation completed successfully"
                );
            }
            Err(error) => {
                error!(
                    error = %error,
                    duration_ms = duration.as_millis(),
                    "Cart operation failed"
                );
            }
        }

        self.metrics
            .record_cart_operation(operation, result.is_ok(), duration.as_secs_f64());
        result
    }

    /// Trace a product catalog operation.
    /// `is_failure` decides which errors count against the error rate.
    #[instrument(skip_all, fields(operation = %operation))]
    pub async fn trace_catalog_operation<F, T, E>(
        &self,
        operation: &str,
        is_failure: fn(&E) -> bool,
        future: F,
    ) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let start_time = Instant::now();
        let result = future.await;
        let duration = start_time.elapsed();

        let success = match &result {
            Ok(_) => {
                info!(
                    duration_ms = duration.as_millis(),
                    "Catalog operation completed successfully"
                );
                true
            }
            Err(error) if is_failure(error) => {
                error!(
                    error = %error,
                    duration_ms = duration.as_millis(),
                    "Catalog operation failed"
                );
                false
            }
            Err(error) => {
                info!(
                    outcome = %error,
                    duration_ms = duration.as_millis(),
                    "Catalog operation rejected input"
                );
                true
            }
        };

        self.metrics
            .record_catalog_operation(operation, success, duration.as_secs_f64());
        result
    }
}
