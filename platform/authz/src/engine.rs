use std::{fmt, sync::Arc};

use tracing::{debug, instrument};

use crate::{
    AdministratorRule, ApprovedReadRule, AuthzError, AuthzSettings, DecisionRule, ManagerRule,
    Operation, OwnerRule, Principal, ResourceAttrs, RoleNames, RuleKind,
};

/// Final answer for one request. Binary by design: granted or not.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Decision {
    succeeded: bool,
}

impl Decision {
    pub fn granted() -> Self {
        Self { succeeded: true }
    }

    pub fn denied() -> Self {
        Self { succeeded: false }
    }

    pub fn succeeded(self) -> bool {
        self.succeeded
    }
}

/// Ordered set of rules collected at startup.
pub struct RuleRegistry<R: ?Sized> {
    rules: Vec<Box<dyn DecisionRule<R>>>,
}

impl<R: ?Sized> Default for RuleRegistry<R> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<R: ?Sized> RuleRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<Rule>(mut self, rule: Rule) -> Self
    where
        Rule: DecisionRule<R> + 'static,
    {
        self.rules.push(Box::new(rule));
        self
    }

    /// Freeze the registration order; the engine never mutates it afterwards.
    pub fn build(self) -> AuthorizationEngine<R> {
        AuthorizationEngine {
            rules: self.rules.into(),
        }
    }
}

/// OR-combines registered rules, first grant wins.
///
/// Cheap to clone and safe to share between concurrent requests: the rule
/// list is immutable once built.
pub struct AuthorizationEngine<R: ?Sized> {
    rules: Arc<[Box<dyn DecisionRule<R>>]>,
}

impl<R: ?Sized> Clone for AuthorizationEngine<R> {
    fn clone(&self) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
        }
    }
}

impl<R: ?Sized> fmt::Debug for AuthorizationEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}

impl<R: ?Sized + 'static> AuthorizationEngine<R> {
    /// Administrator override first, then the manager approval workflow.
    pub fn with_default_rules(roles: &RoleNames) -> Self {
        Self::default_registry(roles).build()
    }

    fn default_registry(roles: &RoleNames) -> RuleRegistry<R> {
        RuleRegistry::new()
            .register(AdministratorRule::new(roles.administrators.clone()))
            .register(ManagerRule::new(roles.managers.clone()))
    }
}

impl<R: ResourceAttrs + ?Sized + 'static> AuthorizationEngine<R> {
    /// Default rules followed by the configured extension rules, in order.
    pub fn from_settings(settings: &AuthzSettings) -> Self {
        settings
            .extra_rules
            .iter()
            .fold(Self::default_registry(&settings.roles), |registry, kind| {
                match kind {
                    RuleKind::Owner => registry.register(OwnerRule),
                    RuleKind::ApprovedRead => registry.register(ApprovedReadRule),
                }
            })
            .build()
    }
}

impl<R: ?Sized> AuthorizationEngine<R> {
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Consult rules in registration order and stop at the first grant.
    ///
    /// Absent principals and resources are passed through untouched; each
    /// rule is responsible for abstaining on them. A panicking rule is a
    /// programming error and unwinds to the caller.
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            operation = %operation,
            principal = principal.map(Principal::id).unwrap_or("<anonymous>"),
            has_resource = resource.is_some(),
        )
    )]
    pub fn authorize(
        &self,
        principal: Option<&Principal>,
        resource: Option<&R>,
        operation: Operation,
    ) -> Decision {
        for rule in self.rules.iter() {
            if rule.evaluate(principal, resource, operation).is_grant() {
                debug!(rule = rule.name(), "granted");
                return Decision::granted();
            }
        }
        debug!("no rule granted");
        Decision::denied()
    }

    pub fn require(
        &self,
        principal: Option<&Principal>,
        resource: Option<&R>,
        operation: Operation,
    ) -> Result<(), AuthzError> {
        if self.authorize(principal, resource, operation).succeeded() {
            Ok(())
        } else {
            Err(AuthzError::Forbidden { operation })
        }
    }
}
