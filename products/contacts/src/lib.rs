//! Contact workflow: every viewing or mutating action is checked against the
//! authorization engine (or, for listings, the visibility predicate) before it
//! touches storage.

mod error;
mod model;
mod seed;
mod service;
mod validation;
mod visibility;

pub use error::{ContactError, ContactOutcome, ContactResult};
pub use model::{Contact, ContactStatus};
pub use seed::seed_demo_contacts;
pub use service::{ContactService, UpdateContact};
pub use validation::{ContactInput, FieldError, ValidationErrors};
pub use visibility::{can_view, visibility_condition};
