//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod http;
pub mod ibd_adapter;
pub mod pulse_adapter;
pub mod text_report_adapter;
pub mod yahoo_adapter;
