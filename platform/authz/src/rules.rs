use crate::{Operation, Principal, roles};

/// What a single rule says about a request.
///
/// There is deliberately no deny variant: abstaining leaves the decision to
/// the other rules and can never veto a grant.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    Grant,
    Abstain,
}

impl Verdict {
    pub fn is_grant(self) -> bool {
        matches!(self, Verdict::Grant)
    }
}

/// Resource facts that ownership and state-aware rules may inspect.
pub trait ResourceAttrs {
    fn owner_id(&self) -> &str;
    fn is_approved(&self) -> bool;
}

/// An independently pluggable unit of policy.
///
/// Implementations must be pure: no I/O, no interior mutation, and no panics
/// for absent principals or resources.
pub trait DecisionRule<R: ?Sized>: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(
        &self,
        principal: Option<&Principal>,
        resource: Option<&R>,
        operation: Operation,
    ) -> Verdict;
}

/// Universal override: administrators may do anything, even without a resource.
#[derive(Clone, Debug)]
pub struct AdministratorRule {
    role: String,
}

impl AdministratorRule {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}

impl Default for AdministratorRule {
    fn default() -> Self {
        Self::new(roles::ADMINISTRATORS)
    }
}

impl<R: ?Sized> DecisionRule<R> for AdministratorRule {
    fn name(&self) -> &'static str {
        "administrator"
    }

    fn evaluate(
        &self,
        principal: Option<&Principal>,
        _resource: Option<&R>,
        _operation: Operation,
    ) -> Verdict {
        match principal {
            Some(p) if p.is_in_role(&self.role) => Verdict::Grant,
            _ => Verdict::Abstain,
        }
    }
}

/// Managers decide lifecycle transitions on existing contacts and nothing else.
#[derive(Clone, Debug)]
pub struct ManagerRule {
    role: String,
}

impl ManagerRule {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}

impl Default for ManagerRule {
    fn default() -> Self {
        Self::new(roles::MANAGERS)
    }
}

impl<R: ?Sized> DecisionRule<R> for ManagerRule {
    fn name(&self) -> &'static str {
        "manager"
    }

    fn evaluate(
        &self,
        principal: Option<&Principal>,
        resource: Option<&R>,
        operation: Operation,
    ) -> Verdict {
        let (Some(principal), Some(_)) = (principal, resource) else {
            return Verdict::Abstain;
        };
        if !operation.is_lifecycle() {
            return Verdict::Abstain;
        }
        if principal.is_in_role(&self.role) {
            Verdict::Grant
        } else {
            Verdict::Abstain
        }
    }
}

/// Owners may read, edit and delete their own contacts.
///
/// Create stays out of reach: ownership is assigned by the workflow itself,
/// so granting it here would let anyone create anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct OwnerRule;

impl<R: ResourceAttrs + ?Sized> DecisionRule<R> for OwnerRule {
    fn name(&self) -> &'static str {
        "owner"
    }

    fn evaluate(
        &self,
        principal: Option<&Principal>,
        resource: Option<&R>,
        operation: Operation,
    ) -> Verdict {
        let (Some(principal), Some(resource)) = (principal, resource) else {
            return Verdict::Abstain;
        };
        let owns = !resource.owner_id().is_empty() && resource.owner_id() == principal.id();
        match operation {
            Operation::Read | Operation::Update | Operation::Delete if owns => Verdict::Grant,
            _ => Verdict::Abstain,
        }
    }
}

/// Any signed-in caller may read an approved contact.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApprovedReadRule;

impl<R: ResourceAttrs + ?Sized> DecisionRule<R> for ApprovedReadRule {
    fn name(&self) -> &'static str {
        "approved-read"
    }

    fn evaluate(
        &self,
        principal: Option<&Principal>,
        resource: Option<&R>,
        operation: Operation,
    ) -> Verdict {
        match (principal, resource, operation) {
            (Some(_), Some(resource), Operation::Read) if resource.is_approved() => Verdict::Grant,
            _ => Verdict::Abstain,
        }
    }
}
