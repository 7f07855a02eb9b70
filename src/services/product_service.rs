use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    CreateProductRequest, Product, ProductId, RepositoryError, ServiceError, ServiceResult,
};
use crate::repositories::{next_numeric_id, ProductCatalog};

/// Concurrent creates can race for the same numeric id
const MAX_CREATE_ATTEMPTS: usize = 3;

/// Service for browsing and creating catalog products
pub struct ProductService {
    catalog: Arc<dyn ProductCatalog>,
}

impl ProductService {
    /// Create a new ProductService
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { catalog }
    }

    /// List all products in catalog order
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        let products = self.catalog.list_all().await?;
        crate::info_with_trace!("Found {} products", products.len());
        Ok(products)
    }

    /// Get a specific product by its raw route identifier
    #[instrument(skip(self), fields(id = %raw_id))]
    pub async fn get_product(&self, raw_id: &str) -> ServiceResult<Product> {
        let id = ProductId::parse(raw_id).map_err(|_| ServiceError::InvalidProductId {
            value: raw_id.to_string(),
        })?;

        match self.catalog.find_by_id(&id).await? {
            Some(product) => {
                crate::info_with_trace!("Product found successfully");
                Ok(product)
            }
            None => {
                crate::warn_with_trace!("Product not found");
                Err(ServiceError::ProductNotFound { id: id.to_string() })
            }
        }
    }

    /// Validate a submitted form and append the product under the next free id
    #[instrument(skip(self, request))]
    pub async fn create_product(&self, request: &CreateProductRequest) -> ServiceResult<Product> {
        let new_product = request
            .parse()
            .map_err(|errors| ServiceError::InvalidForm { errors })?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let existing = self.catalog.list_all().await?;
            let id = next_numeric_id(&existing);
            let product = new_product.clone().with_id(id)?;

            match self.catalog.insert(product).await {
                Ok(created) => {
                    crate::info_with_trace!(product_id = %created.id(), "Product created");
                    return Ok(created);
                }
                Err(RepositoryError::Conflict { key }) if attempt < MAX_CREATE_ATTEMPTS => {
                    crate::warn_with_trace!(key = %key, attempt, "Product id taken, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
