pub mod details;
pub mod list;
pub mod lot_form;
