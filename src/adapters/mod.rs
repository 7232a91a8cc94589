//! Concrete adapter implementations for ports.

pub mod binance_adapter;
pub mod console;
pub mod csv_report_adapter;
pub mod file_config_adapter;
pub mod http;
pub mod yahoo_adapter;
