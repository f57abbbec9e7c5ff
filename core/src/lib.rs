//! churn-core: the engine behind the churn desk.
//!
//! Layering, leaves first:
//!   profile / domain / types   canonical data
//!   adapter                    per-domain payload mapping (strategy table)
//!   estimator / gauge          pure scoring and banding
//!   directory / editor / creation
//!   transport / client         HTTP seam and response classification
//!   workspace                  page controller tying it all together

pub mod adapter;
pub mod client;
pub mod config;
pub mod creation;
pub mod directory;
pub mod domain;
pub mod editor;
pub mod error;
pub mod estimator;
pub mod gauge;
pub mod notification;
pub mod profile;
pub mod rng;
pub mod transport;
pub mod types;
pub mod workspace;
