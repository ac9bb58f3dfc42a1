//! Integration tests for catalog-provider
//!
//! Uses wiremock to simulate a DummyJSON-style products API and verifies
//! end-to-end behavior of the provider adapter: pagination, normalization,
//! and error mapping.

mod common;

mod test_fetch_page;
