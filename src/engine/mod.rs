//! Price estimation engine.
//!
//! Pipeline for one query item:
//! - **comparables**: k nearest same-category listings by weighted distance
//! - **baseline**: closed-form depreciation estimate from the category pool
//! - **market**: normalization of live market quotes into numeric samples
//! - **blend**: fixed-weight ensemble of whichever signals reported
//! - **range**: min/max suggestion around the blended center
//!
//! The numeric core is synchronous and deterministic given the dataset
//! snapshot; only the market fetch and the reasoning call await anything.

pub mod baseline;
pub mod blend;
pub mod comparables;
pub mod market;
pub mod range;
pub mod store;
pub mod suggestor;
pub mod tables;

pub use store::{ListingStore, StoreError};
pub use suggestor::PriceSuggestor;
pub use tables::ScoringTables;
