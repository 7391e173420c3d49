//! Customer entity: who owns the devices on the bench

use crate::core::error::{FieldValidationError, OficinaResult, ValidationError};
use crate::core::field::FieldFormat;
use crate::core::search::Searchable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered customer
///
/// The open-order count shown next to a customer is computed from the order
/// store, never stored here, so it cannot drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier
    pub id: Uuid,
    /// Full name
    pub name: String,
    /// Contact phone, kept as entered ("(11) 99999-1111")
    pub phone: String,
    /// Contact email
    pub email: String,
    /// Street address, free text
    pub address: String,
    /// When the customer was registered
    pub registered_at: DateTime<Utc>,
}

impl Customer {
    /// Build a customer from a validated draft
    pub fn from_draft(draft: CustomerDraft, id: Uuid, registered_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            address: draft.address,
            registered_at,
        }
    }
}

impl Searchable for Customer {
    fn indexed_fields() -> &'static [&'static str] {
        &["name", "email", "phone"]
    }

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "email" => Some(self.email.clone()),
            "phone" => Some(self.phone.clone()),
            _ => None,
        }
    }
}

/// Registration form input, validated before a [`Customer`] exists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl CustomerDraft {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
            address: address.into(),
        }
    }

    /// Validate the draft
    ///
    /// Every field of the registration form is required. Phone and email
    /// must additionally satisfy their format validators; address is free
    /// text. All failures are reported together.
    pub fn validate(&self) -> OficinaResult<()> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldValidationError {
                field: "name".to_string(),
                message: "required".to_string(),
            });
        }

        if self.phone.trim().is_empty() {
            errors.push(FieldValidationError {
                field: "phone".to_string(),
                message: "required".to_string(),
            });
        } else if !FieldFormat::Phone.validate(&self.phone) {
            errors.push(FieldValidationError {
                field: "phone".to_string(),
                message: "not a valid phone number".to_string(),
            });
        }

        if self.email.trim().is_empty() {
            errors.push(FieldValidationError {
                field: "email".to_string(),
                message: "required".to_string(),
            });
        } else if !FieldFormat::Email.validate(self.email.trim()) {
            errors.push(FieldValidationError {
                field: "email".to_string(),
                message: "not a valid email address".to_string(),
            });
        }

        if self.address.trim().is_empty() {
            errors.push(FieldValidationError {
                field: "address".to_string(),
                message: "required".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(errors).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::OficinaError;

    fn valid_draft() -> CustomerDraft {
        CustomerDraft::new(
            "Maria Santos",
            "(11) 99999-1111",
            "maria.santos@email.com",
            "Rua das Flores, 123",
        )
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(valid_draft().validate().is_ok());
    }

    #[test]
    fn test_every_field_is_required() {
        for field in ["name", "phone", "email", "address"] {
            let mut draft = valid_draft();
            match field {
                "name" => draft.name = String::new(),
                "phone" => draft.phone = String::new(),
                "email" => draft.email = String::new(),
                _ => draft.address = String::new(),
            }
            assert!(draft.validate().is_err(), "{} should be required", field);
        }
    }

    #[test]
    fn test_all_missing_fields_are_reported_together() {
        let draft = CustomerDraft::new("", "", "", "");
        let err = draft.validate().unwrap_err();
        match err {
            OficinaError::Validation(ValidationError::FieldErrors(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["name", "phone", "email", "address"]);
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_email_is_rejected() {
        let mut draft = valid_draft();
        draft.email = "not-an-email".to_string();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_from_draft_carries_fields_over() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let customer = Customer::from_draft(valid_draft(), id, now);

        assert_eq!(customer.id, id);
        assert_eq!(customer.name, "Maria Santos");
        assert_eq!(customer.registered_at, now);
    }

    #[test]
    fn test_search_covers_name_email_and_phone() {
        let customer = Customer::from_draft(valid_draft(), Uuid::new_v4(), Utc::now());

        assert_eq!(
            customer.field_text("name").as_deref(),
            Some("Maria Santos")
        );
        assert_eq!(
            customer.field_text("email").as_deref(),
            Some("maria.santos@email.com")
        );
        assert_eq!(
            customer.field_text("phone").as_deref(),
            Some("(11) 99999-1111")
        );
        assert_eq!(customer.field_text("address"), None);
    }
}
