use std::fmt;

use serde::{Deserialize, Serialize};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const ZIP_MIN: usize = 6;
const ZIP_MAX: usize = 7;
const EMAIL_MAX: usize = 320;
const OWNER_MAX: usize = 450;

/// Editable contact fields as a caller submits them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContactInput {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in one submission, in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|err| err.field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
            first = false;
        }
        Ok(())
    }
}

impl ContactInput {
    /// Trim every field and check it, returning the cleaned input.
    pub fn validate(self) -> Result<ContactInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let first_name = required(&mut errors, "first_name", &self.first_name, NAME_MIN, NAME_MAX);
        let last_name = required(&mut errors, "last_name", &self.last_name, NAME_MIN, NAME_MAX);
        let address = required(&mut errors, "address", &self.address, NAME_MIN, NAME_MAX);
        let city = optional(&mut errors, "city", self.city.as_deref());
        let state = optional(&mut errors, "state", self.state.as_deref());
        let zip = required(&mut errors, "zip", &self.zip, ZIP_MIN, ZIP_MAX);
        let email = email(&mut errors, &self.email);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ContactInput {
            first_name,
            last_name,
            address,
            city,
            state,
            zip,
            email,
        })
    }
}

pub(crate) fn validate_owner(owner_id: &str) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let trimmed = owner_id.trim();
    if trimmed.is_empty() {
        errors.push("owner_id", "is required");
    } else if trimmed.chars().count() > OWNER_MAX {
        errors.push("owner_id", format!("must be at most {OWNER_MAX} characters"));
    }
    if errors.is_empty() {
        Ok(trimmed.to_string())
    } else {
        Err(errors)
    }
}

fn required(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, "is required");
    } else {
        check_length(errors, field, trimmed, min, max);
    }
    trimmed.to_string()
}

fn optional(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>) -> Option<String> {
    let trimmed = value.map(str::trim).filter(|v| !v.is_empty())?;
    check_length(errors, field, trimmed, NAME_MIN, NAME_MAX);
    Some(trimmed.to_string())
}

fn check_length(errors: &mut ValidationErrors, field: &'static str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.push(field, format!("must be between {min} and {max} characters"));
    }
}

fn email(errors: &mut ValidationErrors, value: &str) -> String {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        errors.push("email", "is required");
        return normalized;
    }
    let well_formed = match normalized.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !normalized.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !well_formed {
        errors.push("email", "is not a valid email address");
    } else if normalized.chars().count() > EMAIL_MAX {
        errors.push("email", format!("must be at most {EMAIL_MAX} characters"));
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ContactInput {
        ContactInput {
            first_name: " Debra ".into(),
            last_name: "Garcia".into(),
            address: "1234 Main St".into(),
            city: Some("Redmond".into()),
            state: Some("  ".into()),
            zip: "109990".into(),
            email: "Debra@Example.com".into(),
        }
    }

    #[test]
    fn cleans_valid_input() {
        let cleaned = valid().validate().unwrap();
        assert_eq!(cleaned.first_name, "Debra");
        assert_eq!(cleaned.state, None);
        assert_eq!(cleaned.email, "debra@example.com");
    }

    #[test]
    fn collects_every_violation() {
        let input = ContactInput {
            first_name: "D".into(),
            last_name: String::new(),
            city: Some("R".into()),
            zip: "10999".into(),
            email: "not-an-email".into(),
            ..valid()
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            ["first_name", "last_name", "city", "zip", "email"]
        );
        assert!(errors.to_string().starts_with("first_name: must be between 2 and 100"));
    }

    #[test]
    fn errors_serialize_as_field_message_pairs() {
        let input = ContactInput {
            zip: "123".into(),
            ..valid()
        };
        let errors = input.validate().unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json[0]["field"], "zip");
        assert!(json[0]["message"].as_str().unwrap().contains("6 and 7"));
        assert_eq!(json.as_array().unwrap().len(), 1);
    }

    #[test]
    fn name_limits_count_characters() {
        let input = ContactInput {
            last_name: "é".repeat(100),
            ..valid()
        };
        assert!(input.validate().is_ok());
        let input = ContactInput {
            last_name: "é".repeat(101),
            ..valid()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn email_needs_both_sides() {
        for bad in ["@example.com", "debra@", "a@b@c", "de bra@example.com"] {
            let input = ContactInput {
                email: bad.into(),
                ..valid()
            };
            assert!(input.validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn owner_must_not_be_blank() {
        assert_eq!(validate_owner(" u1 ").unwrap(), "u1");
        assert!(validate_owner("   ").is_err());
    }
}
