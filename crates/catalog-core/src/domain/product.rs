//! Product domain entity
//!
//! A [`Product`] is the persisted catalog item. Products come from two
//! places: manual creation through the admin API (no `external_id`), and the
//! reconciliation job (`external_id` set to the provider's identifier).
//! Later reconciliation passes matching the same `external_id` update the
//! existing row; reconciliation never deletes a product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::{ExternalId, ProductId};
use super::record::ExternalRecord;

/// A catalog product
///
/// `id` is the stable local identity used by every other subsystem;
/// `external_id` is the provider-side key and is unique when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Local identifier, stable across reconciliation passes
    id: ProductId,
    /// Provider identifier (None for manually created products)
    external_id: Option<ExternalId>,
    /// Product name
    name: String,
    /// Free-text description
    description: Option<String>,
    /// Unit price, never negative
    price: f64,
    /// Category label
    category: Option<String>,
    /// When the product was first stored
    created_at: DateTime<Utc>,
    /// When the product was last mutated
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a product from a manual API request (no external identity)
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidName` for an empty name and
    /// `DomainError::InvalidPrice` for a negative or non-finite price.
    pub fn new_manual(
        name: impl Into<String>,
        description: Option<String>,
        price: f64,
        category: Option<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        validate_name(&name)?;
        validate_price(price)?;

        let now = Utc::now();
        Ok(Self {
            id: ProductId::new(),
            external_id: None,
            name,
            description,
            price,
            category,
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates a product from a normalized external record
    ///
    /// Used by the reconciler when no product with the record's
    /// `external_id` exists yet.
    pub fn from_external(record: &ExternalRecord) -> Result<Self, DomainError> {
        validate_name(&record.name)?;
        validate_price(record.price)?;

        let now = Utc::now();
        Ok(Self {
            id: ProductId::new(),
            external_id: Some(record.external_id.clone()),
            name: record.name.clone(),
            description: record.description.clone(),
            price: record.price,
            category: record.category.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstructs a product from stored parts
    ///
    /// Intended for repository row mapping; performs no validation because
    /// stored rows already passed it on the way in.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: ProductId,
        external_id: Option<ExternalId>,
        name: String,
        description: Option<String>,
        price: f64,
        category: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            external_id,
            name,
            description,
            price,
            category,
            created_at,
            updated_at,
        }
    }

    // --- Getters ---

    /// Returns the local identifier
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Returns the provider identifier, if any
    pub fn external_id(&self) -> Option<&ExternalId> {
        self.external_id.as_ref()
    }

    /// Returns the product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the unit price
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Returns the category
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns when the product was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the product was last updated
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // --- Mutation ---

    /// Applies an external record to this product, field by field
    ///
    /// Returns `true` if any field actually changed (and bumps
    /// `updated_at`), `false` if the record carried identical values.
    /// The caller decides whether an unchanged product needs a write.
    pub fn apply_external(&mut self, record: &ExternalRecord) -> Result<bool, DomainError> {
        validate_name(&record.name)?;
        validate_price(record.price)?;

        let changed = self.name != record.name
            || self.description != record.description
            || !price_eq(self.price, record.price)
            || self.category != record.category;

        if changed {
            self.name = record.name.clone();
            self.description = record.description.clone();
            self.price = record.price;
            self.category = record.category.clone();
            self.touch();
        }

        Ok(changed)
    }

    /// Renames the product
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    /// Replaces the description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    /// Changes the price
    pub fn set_price(&mut self, price: f64) -> Result<(), DomainError> {
        validate_price(price)?;
        self.price = price;
        self.touch();
        Ok(())
    }

    /// Replaces the category
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), DomainError> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::InvalidPrice(price));
    }
    Ok(())
}

fn price_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < f64::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(external_id: &str, price: f64) -> ExternalRecord {
        ExternalRecord {
            external_id: ExternalId::new(external_id).unwrap(),
            name: "Monitor stand".to_string(),
            description: Some("Bamboo".to_string()),
            price,
            category: Some("office".to_string()),
            raw_payload: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_new_manual_has_no_external_id() {
        let product = Product::new_manual("Notebook", None, 3.50, None).unwrap();
        assert!(product.external_id().is_none());
        assert_eq!(product.name(), "Notebook");
        assert_eq!(product.price(), 3.50);
    }

    #[test]
    fn test_new_manual_rejects_empty_name() {
        let result = Product::new_manual("  ", None, 1.0, None);
        assert!(matches!(result, Err(DomainError::InvalidName(_))));
    }

    #[test]
    fn test_new_manual_rejects_negative_price() {
        let result = Product::new_manual("Notebook", None, -1.0, None);
        assert!(matches!(result, Err(DomainError::InvalidPrice(_))));
    }

    #[test]
    fn test_from_external_carries_external_id() {
        let record = sample_record("a1", 10.0);
        let product = Product::from_external(&record).unwrap();
        assert_eq!(product.external_id().unwrap().as_str(), "a1");
        assert_eq!(product.name(), "Monitor stand");
    }

    #[test]
    fn test_apply_external_detects_change() {
        let record = sample_record("a1", 10.0);
        let mut product = Product::from_external(&record).unwrap();
        let before = product.updated_at();

        let changed = product.apply_external(&sample_record("a1", 15.0)).unwrap();
        assert!(changed);
        assert_eq!(product.price(), 15.0);
        assert!(product.updated_at() >= before);
    }

    #[test]
    fn test_apply_external_identical_record_is_noop() {
        let record = sample_record("a1", 10.0);
        let mut product = Product::from_external(&record).unwrap();
        let before = product.clone();

        let changed = product.apply_external(&record).unwrap();
        assert!(!changed);
        assert_eq!(product, before);
    }

    #[test]
    fn test_apply_external_rejects_bad_price() {
        let record = sample_record("a1", 10.0);
        let mut product = Product::from_external(&record).unwrap();

        let result = product.apply_external(&sample_record("a1", f64::NAN));
        assert!(result.is_err());
        // The product must be left untouched on a rejected record
        assert_eq!(product.price(), 10.0);
    }

    #[test]
    fn test_setters_touch_updated_at() {
        let mut product = Product::new_manual("Notebook", None, 3.50, None).unwrap();
        let before = product.updated_at();

        product.set_price(4.00).unwrap();
        assert_eq!(product.price(), 4.00);
        assert!(product.updated_at() >= before);

        product.set_name("Sketchbook").unwrap();
        assert_eq!(product.name(), "Sketchbook");

        product.set_category(Some("stationery".to_string()));
        assert_eq!(product.category(), Some("stationery"));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let product = Product::new_manual("Notebook", Some("A5".to_string()), 3.50, None).unwrap();
        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product, back);
    }
}
