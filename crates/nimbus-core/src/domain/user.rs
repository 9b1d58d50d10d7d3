// ============================================================================
// Nimbus Core - User Entity
// File: crates/nimbus-core/src/domain/user.rs
// ============================================================================
//! User domain entity, registration input, and the public projection.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use nimbus_shared::constants::MIN_PASSWORD_LENGTH;
use nimbus_shared::utils::normalize_email;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;

/// Stored identity record. Field names match the on-disk JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// Always lower-cased.
    pub email: String,
    #[serde(rename = "password")]
    pub password_digest: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        first_name: String,
        last_name: String,
        email: &str,
        password_digest: String,
        company: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            password_digest,
            first_name,
            last_name,
            company: company.filter(|c| !c.is_empty()),
            created_at: Utc::now(),
        }
    }
}

/// Everything about a user that may leave the service. No digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
}

impl From<&User> for PublicProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            company: user.company.clone(),
        }
    }
}

/// Registration form fields.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, message = "First name is required"))]
    #[serde(default)]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    #[serde(default)]
    pub last_name: String,

    #[validate(length(min = 1, message = "Email is required"))]
    #[serde(default)]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub company: Option<String>,
}

impl RegisterInput {
    /// Required fields first, then password length.
    pub fn check(&self) -> Result<(), DomainError> {
        if let Err(errors) = self.validate() {
            let fields: BTreeMap<String, String> = errors
                .field_errors()
                .into_iter()
                .map(|(field, errs)| {
                    let message = errs
                        .iter()
                        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .unwrap_or_else(|| format!("{} is invalid", field));
                    (field.to_string(), message)
                })
                .collect();
            return Err(DomainError::Validation {
                message: "All fields are required".to_string(),
                fields,
            });
        }

        if (self.password.chars().count() as u64) < MIN_PASSWORD_LENGTH {
            let message = format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH);
            let mut fields = BTreeMap::new();
            fields.insert("password".to_string(), message.clone());
            return Err(DomainError::Validation { message, fields });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> RegisterInput {
        RegisterInput {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "Ann@X.com".to_string(),
            password: "longenough1".to_string(),
            company: None,
        }
    }

    #[test]
    fn test_new_user_normalizes_fields() {
        let user = User::new(
            "Ann".to_string(),
            "Lee".to_string(),
            "Ann@X.com",
            "digest".to_string(),
            Some(String::new()),
        );
        assert_eq!(user.email, "ann@x.com");
        assert_eq!(user.company, None);
        assert_eq!(user.first_name, "Ann");
    }

    #[test]
    fn test_user_json_shape() {
        let user = User::new(
            "Ann".to_string(),
            "Lee".to_string(),
            "ann@x.com",
            "digest".to_string(),
            Some("Acme".to_string()),
        );
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["password"], "digest");
        assert_eq!(value["firstName"], "Ann");
        assert_eq!(value["lastName"], "Lee");
        assert_eq!(value["company"], "Acme");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("password_digest").is_none());
    }

    #[test]
    fn test_reads_documents_without_company() {
        let raw = r#"{
            "id": "6f1c1f0e-8a53-4a43-9d3c-1e7f3b0f9a11",
            "email": "ann@x.com",
            "password": "abc",
            "firstName": "Ann",
            "lastName": "Lee",
            "createdAt": "2024-05-01T10:00:00.000Z"
        }"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.company, None);
        assert_eq!(user.password_digest, "abc");
    }

    #[test]
    fn test_public_profile_has_no_digest() {
        let user = User::new("Ann".into(), "Lee".into(), "ann@x.com", "secret-digest".into(), None);
        let profile = PublicProfile::from(&user);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("secret-digest"));
        assert!(!json.contains("password"));
        assert_eq!(profile.email, "ann@x.com");
    }

    #[test]
    fn test_register_input_checks() {
        assert!(input().check().is_ok());

        let missing = RegisterInput { last_name: String::new(), ..input() };
        match missing.check() {
            Err(DomainError::Validation { message, fields }) => {
                assert_eq!(message, "All fields are required");
                assert_eq!(fields.len(), 1);
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let short = RegisterInput { password: "short".to_string(), ..input() };
        match short.check() {
            Err(DomainError::Validation { message, fields }) => {
                assert_eq!(message, "Password must be at least 8 characters");
                assert!(fields.contains_key("password"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
