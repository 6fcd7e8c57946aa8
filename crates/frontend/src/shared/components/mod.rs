pub mod badge;
pub mod editable_cell;
pub mod error_banner;
pub mod stat_card;
pub mod wizard_steps;
