//! Forms behind the Rechazar and Entregar actions.

mod delivery;
mod reject;

pub use delivery::DeliveryForm;
pub use reject::RejectForm;
