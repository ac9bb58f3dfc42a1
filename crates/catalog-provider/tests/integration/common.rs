//! Shared test helpers for provider integration tests
//!
//! Provides wiremock-based mock server setup for a DummyJSON-style products
//! endpoint. Each helper mounts the necessary mock endpoints and returns a
//! configured provider pointing at the mock server.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalog_provider::{CatalogClient, DummyJsonProvider};

/// Starts a mock server and returns it with a provider pointed at its
/// `/products` endpoint.
pub async fn setup_provider(page_size: u32) -> (MockServer, DummyJsonProvider) {
    let server = MockServer::start().await;
    let client = CatalogClient::with_base_url(format!("{}/products", server.uri()));
    (server, DummyJsonProvider::new(client, page_size))
}

/// Mounts a products response for a specific `skip` offset.
pub async fn mount_page(
    server: &MockServer,
    skip: u64,
    products: serde_json::Value,
    total: u64,
    limit: u32,
) {
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("skip", skip.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "products": products,
            "total": total,
            "skip": skip,
            "limit": limit
        })))
        .mount(server)
        .await;
}
