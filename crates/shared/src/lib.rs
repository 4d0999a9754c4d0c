//! Map region selection and viewport visibility for geotagged problem reports.
//!
//! Everything here is pure: callers hand in coordinates and report snapshots and
//! get back regions, tiers and visible sets. Nothing is cached or retained.

pub mod calc;
pub mod context;
pub mod error;
pub mod filter;
pub mod models;
pub mod region;
pub mod selector;
pub mod viewport;

pub use error::GeoError;
