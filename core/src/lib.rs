//! Merchant investigation dashboard core.
//!
//! Two pure components sit at the centre: the anomaly-flagged series
//! generator (`series`) and the shared record filter (`filter`). Everything
//! else feeds them inputs (rng, clock, config, fixtures) or carries their
//! outputs to the presentation side (notification, dashboard).

pub mod activity;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod fixtures;
pub mod notification;
pub mod record;
pub mod rng;
pub mod series;
pub mod types;
