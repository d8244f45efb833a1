//! Storage infrastructure - on-disk document collections

mod document_store;

pub use document_store::{DocumentStore, Entry};
