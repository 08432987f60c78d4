//! Credit catalogue
//!
//! Read-only listings of credit packs and per-service credit prices.

pub mod model;
pub mod repository;

pub use model::{CreditPack, CreditPricing};
pub use repository::CreditCatalogRepository;
