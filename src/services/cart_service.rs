use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::models::{
    Cart, CartPage, CartState, ProductId, RepositoryError, ServiceError, ServiceResult,
    CART_SESSION_KEY,
};
use crate::repositories::{get_or_default, set, ProductCatalog, SessionStore};

/// Service for managing session-scoped shopping carts.
///
/// The session is passed into every call; nothing is cached between requests,
/// so each operation reads the full id set and writes it back.
pub struct CartService {
    catalog: Arc<dyn ProductCatalog>,
}

impl CartService {
    /// Create a new CartService
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { catalog }
    }

    /// Add a product id to the cart. Unknown ids are accepted; adding twice is a no-op.
    #[instrument(skip(self, session), fields(product_id = %product_id))]
    pub async fn add_item(
        &self,
        session: &dyn SessionStore,
        product_id: &ProductId,
    ) -> ServiceResult<CartState> {
        let mut cart = self.load_cart(session).await?;

        if cart.add(product_id.clone()) {
            info!(cart_size = cart.len(), "Item added to cart");
        } else {
            debug!("Item already in cart");
        }

        self.save_cart(session, &cart).await?;
        Ok(cart.state())
    }

    /// Resolve the cart against the catalog. Ids missing from the catalog are skipped.
    #[instrument(skip(self, session))]
    pub async fn view_cart(&self, session: &dyn SessionStore) -> ServiceResult<CartPage> {
        let cart = self.load_cart(session).await?;
        let products = self.catalog.list_all().await?;
        let cart_products = cart.resolve(&products);

        if cart_products.len() < cart.len() {
            debug!(
                stale = cart.len() - cart_products.len(),
                "Cart references products missing from the catalog"
            );
        }

        info!(
            cart_products = cart_products.len(),
            catalog_products = products.len(),
            "Cart retrieved"
        );
        Ok(CartPage::new(products, cart_products))
    }

    /// Remove the cart from the session. Clearing an empty cart is a no-op.
    #[instrument(skip(self, session))]
    pub async fn clear_all(&self, session: &dyn SessionStore) -> ServiceResult<()> {
        let removed = session
            .delete(CART_SESSION_KEY)
            .await
            .map_err(session_error)?;

        if removed {
            info!("Cart cleared");
        } else {
            debug!("Cart not found, nothing to clear");
        }
        Ok(())
    }

    /// Current logical state of the session's cart
    #[instrument(skip(self, session))]
    pub async fn cart_state(&self, session: &dyn SessionStore) -> ServiceResult<CartState> {
        Ok(self.load_cart(session).await?.state())
    }

    async fn load_cart(&self, session: &dyn SessionStore) -> ServiceResult<Cart> {
        match get_or_default::<Cart>(session, CART_SESSION_KEY).await {
            Ok(cart) => Ok(cart),
            Err(RepositoryError::Serialization { source }) => {
                crate::warn_with_trace!(
                    error = %source,
                    "Stored cart is unreadable, starting from an empty cart"
                );
                Ok(Cart::new())
            }
            Err(err) => Err(session_error(err)),
        }
    }

    async fn save_cart(&self, session: &dyn SessionStore, cart: &Cart) -> ServiceResult<()> {
        set(session, CART_SESSION_KEY, cart)
            .await
            .map_err(session_error)
    }
}

fn session_error(err: RepositoryError) -> ServiceError {
    ServiceError::Session {
        message: err.to_string(),
    }
}
