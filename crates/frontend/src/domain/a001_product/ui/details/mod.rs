//! Product create/edit form.
//!
//! - model.rs: save call
//! - view_model.rs: form state and the save command
//! - view.rs: the form itself

mod model;
mod view;
mod view_model;

pub use view::ProductDetails;
