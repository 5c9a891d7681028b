//! Infrastructure layer: account-scoped catalog sources and the procurement
//! service that loads a snapshot from them and runs the pricing engine.

pub mod catalog;
pub mod read_model;
pub mod service;

pub use catalog::{CatalogSource, InMemoryCatalog, SourceError};
pub use service::{ProcurementService, ServiceError};
