//! Per-product price history persistence

use std::ops::{Deref, DerefMut};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::shared::errors::StoreError;
use crate::shared::types::PriceRange;

use super::KvStore;

/// One dated min/max price snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: NaiveDate,
    pub min: f64,
    pub max: f64,
}

/// Everything tracked about one product, keyed by its listing id.
///
/// `price_history` is append-only, oldest first, and records price
/// transitions rather than every polling cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_name: String,
    pub product_url: String,
    pub price_history: Vec<PriceObservation>,
}

impl ProductRecord {
    pub fn latest_observation(&self) -> Option<&PriceObservation> {
        self.price_history.last()
    }
}

/// Key/value store specialization whose values are [`ProductRecord`]s.
///
/// Derefs to [`KvStore`] for everything that is not product-specific.
#[derive(Debug)]
pub struct PriceHistoryStore {
    kv: KvStore,
}

impl PriceHistoryStore {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Look up the stored record for `product_id`, if any.
    pub fn product(&self, product_id: &str) -> Result<Option<ProductRecord>, StoreError> {
        self.kv.get_json(product_id)
    }

    /// Append a price observation dated today and persist the whole record.
    ///
    /// Reads the prior record (empty history if none), pushes the new
    /// observation, writes the record back under `product_id`, and returns
    /// the updated record.
    pub fn insert_or_update_product(
        &mut self,
        product_id: &str,
        product_name: &str,
        product_url: &str,
        prices: PriceRange,
    ) -> Result<ProductRecord, StoreError> {
        self.record_observation(
            product_id,
            product_name,
            product_url,
            prices,
            Local::now().date_naive(),
        )
    }

    fn record_observation(
        &mut self,
        product_id: &str,
        product_name: &str,
        product_url: &str,
        prices: PriceRange,
        date: NaiveDate,
    ) -> Result<ProductRecord, StoreError> {
        let mut price_history = self
            .product(product_id)?
            .map(|record| record.price_history)
            .unwrap_or_default();

        price_history.push(PriceObservation {
            date,
            min: prices.min,
            max: prices.max,
        });

        let record = ProductRecord {
            product_name: product_name.to_string(),
            product_url: product_url.to_string(),
            price_history,
        };
        self.kv.set_json(product_id, &record)?;
        Ok(record)
    }
}

impl Deref for PriceHistoryStore {
    type Target = KvStore;

    fn deref(&self) -> &Self::Target {
        &self.kv
    }
}

impl DerefMut for PriceHistoryStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.kv
    }
}
