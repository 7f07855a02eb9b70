use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Product, ProductId};

/// Session key holding the cart's product identifiers
pub const CART_SESSION_KEY: &str = "cart_product_data";

/// Shopping cart for one session: membership only, no quantities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    product_ids: BTreeSet<ProductId>,
}

/// Logical state of a session's cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartState {
    Empty,
    NonEmpty,
}

/// Cart page view model: resolved cart contents plus the full catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartPage {
    pub title: String,
    pub subtitle: String,
    pub products: Vec<Product>,
    pub cart_products: Vec<Product>,
}

impl Cart {
    /// Create a new empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a product id; returns false when it was already present
    pub fn add(&mut self, product_id: ProductId) -> bool {
        self.product_ids.insert(product_id)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.product_ids.contains(product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.product_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.product_ids.len()
    }

    pub fn state(&self) -> CartState {
        if self.is_empty() {
            CartState::Empty
        } else {
            CartState::NonEmpty
        }
    }

    /// Keep catalog products that are in the cart, in catalog order.
    /// Ids with no catalog entry are dropped.
    pub fn resolve(&self, catalog: &[Product]) -> Vec<Product> {
        catalog
            .iter()
            .filter(|product| self.contains(product.id()))
            .cloned()
            .collect()
    }
}

impl CartPage {
    pub fn new(products: Vec<Product>, cart_products: Vec<Product>) -> Self {
        Self {
            title: "Cart - Online Store".to_string(),
            subtitle: "Shopping Cart".to_string(),
            products,
            cart_products,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(ProductId::from(121), "Tv samsung", dec!(1000)).unwrap(),
            Product::new(ProductId::from(11), "Iphone", dec!(2000)).unwrap(),
        ]
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();

        assert!(cart.is_empty());
        assert_eq!(cart.len(), 0);
        assert_eq!(cart.state(), CartState::Empty);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut cart = Cart::new();

        assert!(cart.add(ProductId::from(121)));
        assert!(!cart.add(ProductId::from(121)));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.state(), CartState::NonEmpty);
    }

    #[test]
    fn test_resolve_follows_catalog_order() {
        let mut cart = Cart::new();
        cart.add(ProductId::from(11));
        cart.add(ProductId::from(121));

        let resolved = cart.resolve(&catalog());
        let names: Vec<&str> = resolved.iter().map(|p| p.name()).collect();

        assert_eq!(names, vec!["Tv samsung", "Iphone"]);
    }

    #[test]
    fn test_resolve_drops_unknown_ids() {
        let mut cart = Cart::new();
        cart.add(ProductId::from(999));

        assert!(cart.resolve(&catalog()).is_empty());
        assert!(cart.contains(&ProductId::from(999)));
    }

    #[test]
    fn test_serde_shape() {
        let mut cart = Cart::new();
        cart.add(ProductId::from(121));
        cart.add(ProductId::parse("sku-1").unwrap());

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json, serde_json::json!(["121", "sku-1"]));

        let restored: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_cart_page_titles() {
        let page = CartPage::new(catalog(), Vec::new());

        assert_eq!(page.title, "Cart - Online Store");
        assert_eq!(page.subtitle, "Shopping Cart");
        assert_eq!(page.products.len(), 2);
        assert!(page.cart_products.is_empty());
    }
}
