use platform_authz::{
    AdministratorRule, ApprovedReadRule, AuthorizationEngine, ManagerRule, Operation, OwnerRule,
    Principal, ResourceAttrs, RoleNames, RuleRegistry, roles,
};
use proptest::prelude::*;

#[derive(Clone, Debug)]
struct Record {
    owner: String,
    approved: bool,
}

impl ResourceAttrs for Record {
    fn owner_id(&self) -> &str {
        &self.owner
    }

    fn is_approved(&self) -> bool {
        self.approved
    }
}

#[derive(Copy, Clone, Debug)]
enum Kind {
    Administrator,
    Manager,
    Owner,
    ApprovedRead,
}

fn engine_from(kinds: &[Kind]) -> AuthorizationEngine<Record> {
    kinds
        .iter()
        .fold(RuleRegistry::new(), |registry, kind| match kind {
            Kind::Administrator => registry.register(AdministratorRule::default()),
            Kind::Manager => registry.register(ManagerRule::default()),
            Kind::Owner => registry.register(OwnerRule),
            Kind::ApprovedRead => registry.register(ApprovedReadRule),
        })
        .build()
}

fn operation() -> impl Strategy<Value = Operation> {
    prop::sample::select(Operation::ALL.to_vec())
}

fn principal() -> impl Strategy<Value = Option<Principal>> {
    let role = prop::sample::select(vec![
        roles::ADMINISTRATORS,
        roles::MANAGERS,
        roles::USERS,
        "Auditors",
    ]);
    prop::option::of(
        (
            prop::sample::select(vec!["u1", "u2", "u3"]),
            prop::collection::vec(role, 0..3),
        )
            .prop_map(|(id, roles)| Principal::new(id).with_roles(roles)),
    )
}

fn record() -> impl Strategy<Value = Option<Record>> {
    prop::option::of(
        (prop::sample::select(vec!["u1", "u2", ""]), any::<bool>()).prop_map(
            |(owner, approved)| Record {
                owner: owner.to_string(),
                approved,
            },
        ),
    )
}

fn all_kinds() -> Vec<Kind> {
    vec![Kind::Administrator, Kind::Manager, Kind::Owner, Kind::ApprovedRead]
}

proptest! {
    #[test]
    fn registration_order_does_not_change_the_decision(
        order in Just(all_kinds()).prop_shuffle(),
        principal in principal(),
        record in record(),
        op in operation(),
    ) {
        let canonical = engine_from(&all_kinds());
        let shuffled = engine_from(&order);
        prop_assert_eq!(
            canonical.authorize(principal.as_ref(), record.as_ref(), op),
            shuffled.authorize(principal.as_ref(), record.as_ref(), op)
        );
    }

    #[test]
    fn administrators_are_always_allowed(
        principal in principal(),
        record in record(),
        op in operation(),
    ) {
        let engine = AuthorizationEngine::<Record>::with_default_rules(&RoleNames::default());
        let admin = principal
            .unwrap_or_else(|| Principal::new("u1"))
            .with_role(roles::ADMINISTRATORS);
        prop_assert!(engine.authorize(Some(&admin), record.as_ref(), op).succeeded());
    }

    #[test]
    fn lifecycle_needs_a_manager_or_administrator(
        principal in principal(),
        record in record(),
        approve in any::<bool>(),
    ) {
        let engine = AuthorizationEngine::<Record>::with_default_rules(&RoleNames::default());
        let op = if approve { Operation::Approve } else { Operation::Reject };
        let decision = engine.authorize(principal.as_ref(), record.as_ref(), op);
        let expected = match &principal {
            Some(p) if p.is_in_role(roles::ADMINISTRATORS) => true,
            Some(p) if p.is_in_role(roles::MANAGERS) => record.is_some(),
            _ => false,
        };
        prop_assert_eq!(decision.succeeded(), expected);
    }

    #[test]
    fn non_administrators_never_get_field_operations_by_default(
        principal in principal(),
        record in record(),
        op in prop::sample::select(vec![
            Operation::Create,
            Operation::Read,
            Operation::Update,
            Operation::Delete,
        ]),
    ) {
        prop_assume!(principal
            .as_ref()
            .map_or(true, |p| !p.is_in_role(roles::ADMINISTRATORS)));
        let engine = AuthorizationEngine::<Record>::with_default_rules(&RoleNames::default());
        prop_assert!(!engine.authorize(principal.as_ref(), record.as_ref(), op).succeeded());
    }

    #[test]
    fn anonymous_requests_never_panic_and_never_pass(
        order in Just(all_kinds()).prop_shuffle(),
        record in record(),
        op in operation(),
    ) {
        let engine = engine_from(&order);
        prop_assert!(!engine.authorize(None, record.as_ref(), op).succeeded());
    }
}
