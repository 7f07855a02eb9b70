use axum::{
    async_trait,
    extract::{FromRequest, Path, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
    Form,
};
use serde_json::Value;
use tracing::{info, instrument};

use super::{is_catalog_failure, service_error_to_response, AppState};
use crate::models::{
    CreateProductRequest, ProductCreatedPage, ProductFormPage, ProductIndexPage, ProductShowPage,
    ServiceError,
};

/// Product form body, accepted as JSON or as a url-encoded form
#[derive(Debug)]
pub struct ProductSubmission(pub CreateProductRequest);

#[async_trait]
impl<S> FromRequest<S> for ProductSubmission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|content_type| content_type.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let Json(request) = Json::<CreateProductRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(request))
        } else {
            let Form(request) = Form::<CreateProductRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(request))
        }
    }
}

/// List every catalog product
#[instrument(name = "product_index", skip(state))]
pub async fn product_index(
    State(state): State<AppState>,
) -> Result<Json<ProductIndexPage>, (StatusCode, Json<Value>)> {
    state
        .business
        .trace_catalog_operation(
            "list_products",
            is_catalog_failure,
            state.product_service.list_products(),
        )
        .await
        .map(|products| Json(ProductIndexPage::new(products)))
        .map_err(|err| {
            crate::error_with_trace!("Failed to list products: {}", err);
            service_error_to_response(err)
        })
}

/// Show one product; malformed and unknown ids go back to the home page
#[instrument(name = "product_show", skip(state))]
pub async fn product_show(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state
        .business
        .trace_catalog_operation(
            "get_product",
            is_catalog_failure,
            state.product_service.get_product(&id),
        )
        .await;

    match result {
        Ok(product) => Json(ProductShowPage::new(product)).into_response(),
        Err(ServiceError::InvalidProductId { .. }) | Err(ServiceError::ProductNotFound { .. }) => {
            info!("Product unavailable, redirecting home");
            Redirect::to("/").into_response()
        }
        Err(err) => {
            crate::error_with_trace!("Failed to get product {}: {}", id, err);
            service_error_to_response(err).into_response()
        }
    }
}

/// Empty product creation form
#[instrument(name = "product_create_form")]
pub async fn product_create_form() -> Json<ProductFormPage> {
    Json(ProductFormPage::blank())
}

/// Validate and store a submitted product
#[instrument(name = "product_create", skip(state, request))]
pub async fn product_create(
    State(state): State<AppState>,
    ProductSubmission(request): ProductSubmission,
) -> Response {
    let result = state
        .business
        .trace_catalog_operation(
            "create_product",
            is_catalog_failure,
            state.product_service.create_product(&request),
        )
        .await;

    match result {
        Ok(product) => {
            info!(product_id = %product.id(), "Product created");
            (StatusCode::CREATED, Json(ProductCreatedPage::new(product))).into_response()
        }
        Err(ServiceError::InvalidForm { errors }) => {
            crate::warn_with_trace!(fields = %errors, "Product form rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ProductFormPage::with_submission(&request, errors)),
            )
                .into_response()
        }
        Err(err) => {
            crate::error_with_trace!("Failed to create product: {}", err);
            service_error_to_response(err).into_response()
        }
    }
}
