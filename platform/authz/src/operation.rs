use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::AuthzError;

/// Operations a caller may request against a contact.
///
/// The wire names are kept exactly as existing policy data stores them,
/// including the lower-case `create`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "create")]
    Create,
    #[serde(rename = "Read")]
    Read,
    #[serde(rename = "Update")]
    Update,
    #[serde(rename = "Delete")]
    Delete,
    #[serde(rename = "Approve")]
    Approve,
    #[serde(rename = "Reject")]
    Reject,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Create,
        Operation::Read,
        Operation::Update,
        Operation::Delete,
        Operation::Approve,
        Operation::Reject,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "Read",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
            Operation::Approve => "Approve",
            Operation::Reject => "Reject",
        }
    }

    /// Approve and Reject gate lifecycle transitions rather than field edits.
    pub fn is_lifecycle(self) -> bool {
        matches!(self, Operation::Approve | Operation::Reject)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == value)
            .ok_or_else(|| AuthzError::UnknownOperation(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_keep_their_original_casing() {
        let names: Vec<_> = Operation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(
            names,
            ["create", "Read", "Update", "Delete", "Approve", "Reject"]
        );
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert_eq!("create".parse::<Operation>(), Ok(Operation::Create));
        assert_eq!("Approve".parse::<Operation>(), Ok(Operation::Approve));
        assert_eq!(
            "Create".parse::<Operation>(),
            Err(AuthzError::UnknownOperation("Create".into()))
        );
        assert!("read".parse::<Operation>().is_err());
    }

    #[test]
    fn serde_uses_literal_names() {
        let json = serde_json::to_string(&[Operation::Create, Operation::Reject]).unwrap();
        assert_eq!(json, r#"["create","Reject"]"#);
        let parsed: Operation = serde_json::from_str(r#""Update""#).unwrap();
        assert_eq!(parsed, Operation::Update);
    }

    #[test]
    fn only_approve_and_reject_are_lifecycle() {
        let lifecycle: Vec<_> = Operation::ALL
            .into_iter()
            .filter(|op| op.is_lifecycle())
            .collect();
        assert_eq!(lifecycle, [Operation::Approve, Operation::Reject]);
    }
}
