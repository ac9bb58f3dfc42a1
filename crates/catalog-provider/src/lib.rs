//! Catalog Provider - external product listing adapters
//!
//! Driven adapters implementing the `ICatalogProvider` port from
//! `catalog-core`. The shipped implementation targets DummyJSON-style
//! paginated product APIs; further providers plug in through the same port
//! and the [`provider_from_config`] factory.
//!
//! ## Modules
//!
//! - [`client`] - Thin HTTP client with base URL and timeout handling
//! - [`dummyjson`] - DummyJSON wire types and record normalization
//! - [`provider`] - Port implementation and configuration-driven factory

pub mod client;
pub mod dummyjson;
pub mod provider;

pub use client::CatalogClient;
pub use provider::{provider_from_config, DummyJsonProvider};
