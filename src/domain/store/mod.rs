//! Store domain - key/value persistence and the price-history specialization

mod kv;
mod price_history;
mod registry;
mod value;

pub use kv::KvStore;
pub use price_history::{PriceHistoryStore, PriceObservation, ProductRecord};
pub use registry::{Retailer, StoreRegistry};
pub use value::StoreValue;
