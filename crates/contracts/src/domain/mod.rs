pub mod a001_product;
pub mod a002_provider;
pub mod a003_farm;
pub mod a004_movement;
pub mod a005_request;
pub mod common;
