//! sea-orm entities for the contact manager.

pub mod contact;
