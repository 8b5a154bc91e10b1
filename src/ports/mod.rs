//! Port traits the pipeline talks to; adapters implement them.

pub mod config_port;
pub mod price_port;
pub mod pulse_port;
pub mod quote_port;
pub mod report_port;
pub mod research_port;
