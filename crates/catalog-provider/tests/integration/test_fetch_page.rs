//! Integration tests for DummyJsonProvider::fetch_page
//!
//! Verifies end-to-end behavior against a wiremock-based mock API:
//! - Single-page and multi-page listings
//! - Cursor restartability
//! - Malformed record tolerance
//! - HTTP and decode error mapping with cursor preservation

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalog_core::ports::catalog_provider::{
    ICatalogProvider, PageCursor, ProviderError,
};
use catalog_provider::{CatalogClient, DummyJsonProvider};

use crate::common;

#[tokio::test]
async fn test_single_page_listing() {
    let (server, provider) = common::setup_provider(30).await;

    common::mount_page(
        &server,
        0,
        serde_json::json!([
            {"id": 1, "title": "Essence Mascara", "price": 9.99, "category": "beauty"},
            {"id": 2, "title": "Eyeshadow Palette", "price": 19.99, "category": "beauty"}
        ]),
        2,
        30,
    )
    .await;

    let page = provider.fetch_page(None).await.expect("fetch failed");

    assert_eq!(page.records.len(), 2);
    assert!(page.next_cursor.is_none());

    let first = &page.records[0];
    assert_eq!(first.external_id.as_str(), "1");
    assert_eq!(first.name, "Essence Mascara");
    assert_eq!(first.price, 9.99);
    assert_eq!(first.category.as_deref(), Some("beauty"));
}

#[tokio::test]
async fn test_multi_page_listing_follows_cursor() {
    let (server, provider) = common::setup_provider(2).await;

    common::mount_page(
        &server,
        0,
        serde_json::json!([
            {"id": 1, "title": "A", "price": 1.0},
            {"id": 2, "title": "B", "price": 2.0}
        ]),
        3,
        2,
    )
    .await;
    common::mount_page(
        &server,
        2,
        serde_json::json!([{"id": 3, "title": "C", "price": 3.0}]),
        3,
        2,
    )
    .await;

    // Page 1
    let page1 = provider.fetch_page(None).await.unwrap();
    assert_eq!(page1.records.len(), 2);
    let cursor = page1.next_cursor.expect("expected a next cursor");
    assert_eq!(cursor.offset(), 2);

    // Page 2 via the returned cursor
    let page2 = provider.fetch_page(Some(&cursor)).await.unwrap();
    assert_eq!(page2.records.len(), 1);
    assert_eq!(page2.records[0].external_id.as_str(), "3");
    assert!(page2.next_cursor.is_none());
}

#[tokio::test]
async fn test_fetch_is_restartable_from_cursor_zero() {
    let (server, provider) = common::setup_provider(30).await;

    common::mount_page(
        &server,
        0,
        serde_json::json!([{"id": 1, "title": "A", "price": 1.0}]),
        1,
        30,
    )
    .await;

    let first = provider.fetch_page(None).await.unwrap();
    let second = provider.fetch_page(None).await.unwrap();
    assert_eq!(first.records.len(), second.records.len());
    assert_eq!(
        first.records[0].external_id.as_str(),
        second.records[0].external_id.as_str()
    );
}

#[tokio::test]
async fn test_malformed_record_dropped_page_survives() {
    let (server, provider) = common::setup_provider(30).await;

    common::mount_page(
        &server,
        0,
        serde_json::json!([
            {"id": 1, "title": "Good", "price": 1.0},
            {"id": 2, "title": "No price at all"},
            {"id": 3, "title": "Negative", "price": -4.0},
            {"id": 4, "title": "Also good", "price": 4.0}
        ]),
        4,
        30,
    )
    .await;

    let page = provider.fetch_page(None).await.unwrap();

    let ids: Vec<&str> = page
        .records
        .iter()
        .map(|r| r.external_id.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "4"]);
}

#[tokio::test]
async fn test_server_error_maps_to_http_error_with_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = CatalogClient::with_base_url(format!("{}/products", server.uri()));
    let provider = DummyJsonProvider::new(client, 30);

    let cursor = PageCursor::new(60);
    let err = provider.fetch_page(Some(&cursor)).await.unwrap_err();

    assert!(matches!(err, ProviderError::Http { offset: 60, .. }));
    assert_eq!(err.offset(), 60);
}

#[tokio::test]
async fn test_garbage_body_maps_to_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let client = CatalogClient::with_base_url(format!("{}/products", server.uri()));
    let provider = DummyJsonProvider::new(client, 30);

    let err = provider.fetch_page(None).await.unwrap_err();
    assert!(matches!(err, ProviderError::Decode { offset: 0, .. }));
}

#[tokio::test]
async fn test_connection_refused_maps_to_http_error() {
    // Nothing listens on this port
    let client = CatalogClient::with_base_url("http://127.0.0.1:1/products");
    let provider = DummyJsonProvider::new(client, 30);

    let err = provider.fetch_page(None).await.unwrap_err();
    assert!(matches!(err, ProviderError::Http { offset: 0, .. }));
}

#[tokio::test]
async fn test_requested_page_size_reaches_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("limit", "15"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "products": [],
            "total": 0,
            "skip": 0,
            "limit": 15
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = CatalogClient::with_base_url(format!("{}/products", server.uri()));
    let provider = DummyJsonProvider::new(client, 15);

    let page = provider.fetch_page(None).await.unwrap();
    assert!(page.records.is_empty());
    assert!(page.next_cursor.is_none());
}
