//! marketscout: stock research automation.
//!
//! Downloads IBD curated stock lists, runs a technical trend checklist per
//! symbol and archives the daily Market Pulse chart.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
