//! Create-or-update reconciliation pass
//!
//! The [`Reconciler`] takes one batch of normalized external records
//! (typically one provider page) and applies it to the product store:
//!
//! 1. Look up the existing product by `external_id`.
//! 2. Absent: create a new product with a fresh local id, count as created.
//! 3. Present: compare field by field, write only if something differs,
//!    count as updated either way. There is no separate "unchanged" bucket;
//!    a second pass over identical data reports every record as updated.
//! 4. A failed write records `{external_id, reason}` and the pass moves on
//!    to the next record. One bad record never aborts the batch.
//!
//! Each record's write is an individual statement, so a mid-batch failure
//! leaves prior records committed. Ordering follows provider order.

use std::sync::Arc;

use tracing::{debug, warn};

use catalog_core::domain::product::Product;
use catalog_core::domain::record::ExternalRecord;
use catalog_core::domain::sync_run::{ReconcileReport, RunError};
use catalog_core::ports::repositories::IProductRepository;

/// Outcome of reconciling a single record
enum Outcome {
    /// A new product was inserted
    Created,
    /// An existing product was matched (written or identical)
    Updated,
}

/// Applies batches of external records to the product store
pub struct Reconciler {
    products: Arc<dyn IProductRepository>,
}

impl Reconciler {
    /// Creates a reconciler over the given product repository
    pub fn new(products: Arc<dyn IProductRepository>) -> Self {
        Self { products }
    }

    /// Reconciles one batch of records and tallies the outcomes
    ///
    /// The returned report always satisfies
    /// `created + updated + failed == fetched`.
    pub async fn reconcile_page(&self, records: &[ExternalRecord]) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for record in records {
            report.fetched += 1;

            match self.reconcile_record(record).await {
                Ok(Outcome::Created) => report.created += 1,
                Ok(Outcome::Updated) => report.updated += 1,
                Err(err) => {
                    warn!(
                        external_id = %record.external_id,
                        error = %format!("{err:#}"),
                        "Record write failed, continuing with batch"
                    );
                    report.failed += 1;
                    report
                        .errors
                        .push(RunError::record(record.external_id.clone(), format!("{err:#}")));
                }
            }
        }

        debug!(
            fetched = report.fetched,
            created = report.created,
            updated = report.updated,
            failed = report.failed,
            "Reconciled batch"
        );

        report
    }

    /// Reconciles a single record: insert when absent, update when present
    async fn reconcile_record(&self, record: &ExternalRecord) -> anyhow::Result<Outcome> {
        match self.products.get_by_external_id(&record.external_id).await? {
            Some(mut product) => {
                let changed = product.apply_external(record)?;
                if changed {
                    self.products.update(&product).await?;
                }
                Ok(Outcome::Updated)
            }
            None => {
                let product = Product::from_external(record)?;
                self.products.insert(&product).await?;
                Ok(Outcome::Created)
            }
        }
    }
}
