use std::{fmt, str::FromStr};

use chrono::{DateTime, FixedOffset};
use entity::contact;
use platform_authz::ResourceAttrs;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ContactError;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ContactStatus {
    #[default]
    Submitted,
    Approved,
    Rejected,
}

impl ContactStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactStatus::Submitted => "Submitted",
            ContactStatus::Approved => "Approved",
            ContactStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = ContactError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "submitted" => Ok(ContactStatus::Submitted),
            "approved" => Ok(ContactStatus::Approved),
            "rejected" => Ok(ContactStatus::Rejected),
            _ => Err(ContactError::UnknownStatus(value.to_string())),
        }
    }
}

impl From<contact::Status> for ContactStatus {
    fn from(value: contact::Status) -> Self {
        match value {
            contact::Status::Submitted => ContactStatus::Submitted,
            contact::Status::Approved => ContactStatus::Approved,
            contact::Status::Rejected => ContactStatus::Rejected,
        }
    }
}

impl From<ContactStatus> for contact::Status {
    fn from(value: ContactStatus) -> Self {
        match value {
            ContactStatus::Submitted => contact::Status::Submitted,
            ContactStatus::Approved => contact::Status::Approved,
            ContactStatus::Rejected => contact::Status::Rejected,
        }
    }
}

/// The protected resource as the workflow and the rules see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub id: Uuid,
    pub owner_id: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: String,
    pub email: String,
    pub status: ContactStatus,
    pub version: i32,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl Contact {
    pub(crate) fn to_active_model(&self) -> contact::ActiveModel {
        contact::ActiveModel {
            id: Set(self.id),
            owner_id: Set(self.owner_id.clone()),
            first_name: Set(self.first_name.clone()),
            last_name: Set(self.last_name.clone()),
            address: Set(self.address.clone()),
            city: Set(self.city.clone()),
            state: Set(self.state.clone()),
            zip: Set(self.zip.clone()),
            email: Set(self.email.clone()),
            status: Set(self.status.into()),
            version: Set(self.version),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }
}

impl From<contact::Model> for Contact {
    fn from(model: contact::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            first_name: model.first_name,
            last_name: model.last_name,
            address: model.address,
            city: model.city,
            state: model.state,
            zip: model.zip,
            email: model.email,
            status: model.status.into(),
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl ResourceAttrs for Contact {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn is_approved(&self) -> bool {
        self.status == ContactStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_loosely_for_cli_input() {
        assert_eq!("approved".parse::<ContactStatus>().unwrap(), ContactStatus::Approved);
        assert_eq!(" Rejected ".parse::<ContactStatus>().unwrap(), ContactStatus::Rejected);
        let err = "approve".parse::<ContactStatus>().unwrap_err();
        assert!(matches!(&err, ContactError::UnknownStatus(raw) if raw == "approve"));
        assert_eq!(err.code(), "VALIDATION");
    }
}
