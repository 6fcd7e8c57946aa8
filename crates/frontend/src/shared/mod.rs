pub mod api_utils;
pub mod components;
pub mod config;
pub mod date_utils;
pub mod http;
pub mod list_utils;
pub mod modal_frame;
pub mod modal_stack;
pub mod number_format;
pub mod page_frame;
pub mod polling;
pub mod refresh;
