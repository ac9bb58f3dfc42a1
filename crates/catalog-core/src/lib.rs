//! Catalog Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Product`, `User`, `SyncRun`, `ExternalRecord`
//! - **Port definitions** - Traits for adapters: `ICatalogProvider`,
//!   `IProductRepository`, `IUserRepository`, `IRunRepository`
//! - **Configuration** - Typed configuration with loading and validation
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no external dependencies.
//! Ports define trait interfaces that adapter crates implement: the provider
//! adapter feeds `ExternalRecord`s in, the store persists `Product`s, and the
//! sync crate orchestrates reconciliation runs tracked as `SyncRun`s.

pub mod config;
pub mod domain;
pub mod ports;
