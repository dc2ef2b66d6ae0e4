//! Authorization primitives for the contact manager.
//!
//! A request is a `(principal, resource, operation)` triple. Each registered
//! [`DecisionRule`] either grants or abstains, and the [`AuthorizationEngine`]
//! OR-combines them in registration order, stopping at the first grant.

mod engine;
mod error;
mod operation;
mod principal;
mod rules;
mod settings;

pub use engine::{AuthorizationEngine, Decision, RuleRegistry};
pub use error::AuthzError;
pub use operation::Operation;
pub use principal::{Principal, RoleNames, roles};
pub use rules::{
    AdministratorRule, ApprovedReadRule, DecisionRule, ManagerRule, OwnerRule, ResourceAttrs,
    Verdict,
};
pub use settings::{AuthzSettings, RuleKind};
