use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Json, Redirect},
};
use serde_json::Value;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use super::{service_error_to_response, AppState};
use crate::models::{CartPage, ProductId};

const CART_PATH: &str = "/cart/";

/// Show the session's cart next to the full catalog
#[instrument(name = "cart_index", skip(state, session))]
pub async fn cart_index(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CartPage>, (StatusCode, Json<Value>)> {
    state
        .business
        .trace_cart_operation("view_cart", state.cart_service.view_cart(&session))
        .await
        .map(Json)
        .map_err(|err| {
            crate::error_with_trace!("Failed to view cart: {}", err);
            service_error_to_response(err)
        })
}

/// Add a product id to the cart and return to the cart page
#[instrument(name = "cart_add", skip(state, session))]
pub async fn cart_add(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<String>,
) -> Result<Redirect, (StatusCode, Json<Value>)> {
    let product_id = match ProductId::parse(&product_id) {
        Ok(id) => id,
        Err(err) => {
            warn!(error = %err, "Ignoring malformed product id");
            return Ok(Redirect::to(CART_PATH));
        }
    };

    let state_after = state
        .business
        .trace_cart_operation(
            "add_item",
            state.cart_service.add_item(&session, &product_id),
        )
        .await
        .map_err(|err| {
            crate::error_with_trace!("Failed to add item to cart: {}", err);
            service_error_to_response(err)
        })?;

    info!(cart = ?state_after, "Item added, redirecting to cart");
    Ok(Redirect::to(CART_PATH))
}

/// Empty the cart and return to the cart page
#[instrument(name = "cart_remove_all", skip(state, session))]
pub async fn cart_remove_all(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, (StatusCode, Json<Value>)> {
    state
        .business
        .trace_cart_operation("clear_all", state.cart_service.clear_all(&session))
        .await
        .map_err(|err| {
            crate::error_with_trace!("Failed to clear cart: {}", err);
            service_error_to_response(err)
        })?;

    Ok(Redirect::to(CART_PATH))
}
