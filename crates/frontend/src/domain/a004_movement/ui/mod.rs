pub mod list;
pub mod wizards;
