use async_trait::async_trait;
use rust_decimal_macros::dec;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::models::{Product, ProductId, RepositoryError, RepositoryResult};

/// Read model of the product catalog, iterated in insertion order
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// All products, in catalog order
    async fn list_all(&self) -> RepositoryResult<Vec<Product>>;

    /// Find a product by its ID; unknown ids yield `None`
    async fn find_by_id(&self, id: &ProductId) -> RepositoryResult<Option<Product>>;

    /// Append a product; fails on a duplicate id
    async fn insert(&self, product: Product) -> RepositoryResult<Product>;

    /// Count products in the catalog
    async fn count(&self) -> RepositoryResult<usize>;
}

/// In-memory catalog shared across requests
#[derive(Debug, Default)]
pub struct InMemoryProductCatalog {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from products in the given order. Later duplicates are dropped.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut unique: Vec<Product> = Vec::new();
        for product in products {
            if !unique.iter().any(|p| p.id() == product.id()) {
                unique.push(product);
            }
        }
        Self {
            products: RwLock::new(unique),
        }
    }

    /// The store's demo products
    pub fn demo() -> Self {
        Self::with_products(demo_products())
    }
}

/// Seed products served when the catalog is started with demo data
pub fn demo_products() -> Vec<Product> {
    [
        (0, "TV", dec!(468.99)),
        (1, "iPhone", dec!(897.99)),
        (2, "Chromecast", dec!(49.99)),
        (3, "Glasses", dec!(79.99)),
    ]
    .into_iter()
    .filter_map(|(id, name, price)| Product::new(ProductId::from(id), name, price).ok())
    .collect()
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    #[instrument(name = "catalog.list_all", skip(self))]
    async fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        let products = self.products.read().await;
        debug!(count = products.len(), "Listing catalog");
        Ok(products.clone())
    }

    #[instrument(name = "catalog.find_by_id", skip(self), fields(product_id = %id))]
    async fn find_by_id(&self, id: &ProductId) -> RepositoryResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id() == id).cloned())
    }

    #[instrument(name = "catalog.insert", skip(self, product), fields(product_id = %product.id()))]
    async fn insert(&self, product: Product) -> RepositoryResult<Product> {
        let mut products = self.products.write().await;
        if products.iter().any(|p| p.id() == product.id()) {
            return Err(RepositoryError::Conflict {
                key: product.id().to_string(),
            });
        }
        products.push(product.clone());
        info!(count = products.len(), "Product added to catalog");
        Ok(product)
    }

    async fn count(&self) -> RepositoryResult<usize> {
        Ok(self.products.read().await.len())
    }
}

/// Next free integer id: one past the largest numeric id, or 0 for an empty catalog
pub fn next_numeric_id(products: &[Product]) -> ProductId {
    products
        .iter()
        .filter_map(|p| p.id().as_number())
        .max()
        .and_then(|max| max.checked_add(1))
        .map(ProductId::from)
        .unwrap_or_else(|| ProductId::from(0))
}
