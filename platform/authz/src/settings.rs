use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AuthzError, RoleNames};

/// Extension rules that can be switched on without touching the engine.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    Owner,
    ApprovedRead,
}

impl FromStr for RuleKind {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "owner" => Ok(RuleKind::Owner),
            "approved-read" => Ok(RuleKind::ApprovedRead),
            other => Err(AuthzError::UnknownRule(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthzSettings {
    pub roles: RoleNames,
    pub extra_rules: Vec<RuleKind>,
}

impl AuthzSettings {
    /// Reads `AUTHZ_*_ROLE` and `AUTHZ_EXTRA_RULES` (comma separated).
    pub fn from_env() -> Result<Self, AuthzError> {
        let extra_rules = match std::env::var("AUTHZ_EXTRA_RULES") {
            Ok(raw) => parse_rule_list(&raw)?,
            Err(_) => Vec::new(),
        };
        Ok(Self {
            roles: RoleNames::from_env(),
            extra_rules,
        })
    }
}

fn parse_rule_list(raw: &str) -> Result<Vec<RuleKind>, AuthzError> {
    let mut rules = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind = name.parse()?;
        if !rules.contains(&kind) {
            rules.push(kind);
        }
    }
    Ok(rules)
}
