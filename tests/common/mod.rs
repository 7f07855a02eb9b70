use std::sync::Arc;
use std::time::Duration;

use reqwest::{redirect, Client, Response};
use rust_decimal_macros::dec;
use tokio::net::TcpListener;

use storefront_rs::{
    create_app,
    models::{Product, ProductId},
    observability::Metrics,
    repositories::{ExpiringMemoryStore, InMemoryProductCatalog},
    Config,
};

pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
    pub sessions: ExpiringMemoryStore,
}

/// The two-product catalog used across cart scenarios
pub fn scenario_catalog() -> Vec<Product> {
    vec![
        Product::new(ProductId::from(121), "Tv samsung", dec!(1000)).unwrap(),
        Product::new(ProductId::from(11), "Iphone", dec!(2000)).unwrap(),
    ]
}

/// Browser-like client: keeps its session cookie and does not follow redirects
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to build client")
}

impl TestEnvironment {
    pub async fn new() -> Self {
        Self::with_catalog(InMemoryProductCatalog::with_products(scenario_catalog())).await
    }

    pub async fn with_catalog(catalog: InMemoryProductCatalog) -> Self {
        Self::with_config(Config::default(), catalog).await
    }

    pub async fn with_config(config: Config, catalog: InMemoryProductCatalog) -> Self {
        let sessions = ExpiringMemoryStore::new();
        let app = create_app(
            &config,
            Arc::new(catalog),
            sessions.clone(),
            Arc::new(Metrics::new().expect("Failed to create metrics")),
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to serve app");
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        Self {
            client: session_client(),
            base_url,
            sessions,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json(&self, client: &Client, path: &str) -> serde_json::Value {
        let response = client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status().as_u16(), 200, "GET {}", path);
        response.json().await.expect("Failed to parse response")
    }

    pub async fn post_empty(&self, client: &Client, path: &str) -> Response {
        client
            .post(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Names of the products currently shown in the cart
    pub async fn cart_names(&self, client: &Client) -> Vec<String> {
        let page = self.get_json(client, "/cart/").await;
        page["cart_products"]
            .as_array()
            .expect("Expected cart_products array")
            .iter()
            .map(|p| p["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}
