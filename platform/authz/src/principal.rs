use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Role names as the identity store hands them out.
pub mod roles {
    pub const ADMINISTRATORS: &str = "Administrators";
    pub const MANAGERS: &str = "Managers";
    /// Present in the catalog for future rules; nothing branches on it yet.
    pub const USERS: &str = "Users";
}

/// The authenticated caller: a stable id plus the roles it was granted.
///
/// Built once per request and passed explicitly to every check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: String,
    roles: BTreeSet<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            roles: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }

    pub fn is_in_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Concrete role strings a deployment uses for each catalog role.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RoleNames {
    pub administrators: String,
    pub managers: String,
    pub users: String,
}

impl Default for RoleNames {
    fn default() -> Self {
        Self {
            administrators: roles::ADMINISTRATORS.into(),
            managers: roles::MANAGERS.into(),
            users: roles::USERS.into(),
        }
    }
}

impl RoleNames {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            administrators: env_or("AUTHZ_ADMINISTRATORS_ROLE", defaults.administrators),
            managers: env_or("AUTHZ_MANAGERS_ROLE", defaults.managers),
            users: env_or("AUTHZ_USERS_ROLE", defaults.users),
        }
    }

    /// Administrators and managers see every contact regardless of state.
    pub fn is_privileged(&self, principal: &Principal) -> bool {
        principal.is_in_role(&self.administrators) || principal.is_in_role(&self.managers)
    }
}

fn env_or(key: &str, fallback: String) -> String {
    std::env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
        .unwrap_or(fallback)
}
