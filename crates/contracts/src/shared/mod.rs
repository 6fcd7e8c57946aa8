pub mod config;
pub mod dashboard;
pub mod list_filter;
pub mod stock;
pub mod wizard;
