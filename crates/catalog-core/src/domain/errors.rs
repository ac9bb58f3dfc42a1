//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including validation failures and invalid state transitions.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid email address format
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    /// Invalid external identifier (empty or whitespace-only)
    #[error("Invalid external id: {0}")]
    InvalidExternalId(String),

    /// Product name is empty or otherwise unusable
    #[error("Invalid product name: {0}")]
    InvalidName(String),

    /// Price is negative or not a finite number
    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    /// Invalid state transition attempt
    #[error("Invalid state transition from {from} to {to}")]
    InvalidState {
        /// The current state
        from: String,
        /// The attempted target state
        to: String,
    },

    /// Unknown role name
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
