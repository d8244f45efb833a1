use serde::{Deserialize, Serialize};

use crate::shared::types::PriceRange;

/// One product entry parsed out of a listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListing {
    pub product_id: String,
    pub product_name: String,
    pub product_url: String,
    pub prices: PriceRange,
}
