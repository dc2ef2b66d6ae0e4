use entity::contact;
use platform_authz::{Principal, RoleNames};
use sea_orm::{ColumnTrait, Condition};

use crate::{Contact, ContactStatus};

/// Listing predicate: privileged callers see everything, everyone else sees
/// approved contacts plus their own submissions.
///
/// This runs in the query instead of going through the engine per row, so it
/// must be kept in step with [`can_view`].
pub fn visibility_condition(principal: Option<&Principal>, roles: &RoleNames) -> Condition {
    let approved = contact::Column::Status.eq(contact::Status::Approved);
    match principal {
        Some(p) if roles.is_privileged(p) => Condition::all(),
        Some(p) if !p.id().is_empty() => Condition::any()
            .add(approved)
            .add(contact::Column::OwnerId.eq(p.id())),
        _ => Condition::all().add(approved),
    }
}

pub fn can_view(principal: Option<&Principal>, contact: &Contact, roles: &RoleNames) -> bool {
    if contact.status == ContactStatus::Approved {
        return true;
    }
    match principal {
        Some(p) => roles.is_privileged(p) || (!p.id().is_empty() && p.id() == contact.owner_id),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use platform_authz::roles;
    use uuid::Uuid;

    use super::*;

    fn contact(owner: &str, status: ContactStatus) -> Contact {
        let now = Utc::now().into();
        Contact {
            id: Uuid::new_v4(),
            owner_id: owner.into(),
            first_name: "Yuhong".into(),
            last_name: "Li".into(),
            address: "9012 State st".into(),
            city: None,
            state: None,
            zip: "109990".into(),
            email: "yuhong@example.com".into(),
            status,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owners_see_their_rejected_contacts() {
        let names = RoleNames::default();
        let rejected = contact("u1", ContactStatus::Rejected);
        let owner = Principal::new("u1").with_role(roles::USERS);
        let stranger = Principal::new("u3").with_role(roles::USERS);

        assert!(can_view(Some(&owner), &rejected, &names));
        assert!(!can_view(Some(&stranger), &rejected, &names));
        assert!(!can_view(None, &rejected, &names));
    }

    #[test]
    fn approved_contacts_are_public() {
        let names = RoleNames::default();
        let approved = contact("u1", ContactStatus::Approved);
        assert!(can_view(None, &approved, &names));
        assert!(can_view(Some(&Principal::new("u9")), &approved, &names));
    }

    #[test]
    fn managers_and_administrators_see_everything() {
        let names = RoleNames::default();
        let submitted = contact("u1", ContactStatus::Submitted);
        for role in [roles::MANAGERS, roles::ADMINISTRATORS] {
            let caller = Principal::new("x").with_role(role);
            assert!(can_view(Some(&caller), &submitted, &names));
        }
    }

    #[test]
    fn blank_caller_id_does_not_match_orphans() {
        let orphan = contact("", ContactStatus::Submitted);
        assert!(!can_view(Some(&Principal::new("")), &orphan, &RoleNames::default()));
    }
}
