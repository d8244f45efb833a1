//! Price change detection

use crate::domain::store::ProductRecord;
use crate::shared::types::PriceRange;

/// Whether an observation should be appended to a product's history.
///
/// A product counts as changed on first sight, or when the most recent
/// stored observation's `min`/`max` differ (either one) from the newly
/// observed pair. Name and url changes alone do not count. Unchanged
/// observations are dropped by the caller, so the stored history is a log
/// of price transitions rather than a full polling log.
pub fn price_changed(existing: Option<&ProductRecord>, observed: PriceRange) -> bool {
    match existing.and_then(ProductRecord::latest_observation) {
        Some(last) => last.min != observed.min || last.max != observed.max,
        None => true,
    }
}
