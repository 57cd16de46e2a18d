use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::accounts::repo_types::Account;

/// Request body for registration. Fields are optional at the wire level so
/// that missing ones surface as validation errors, not deserialization
/// failures.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_image: Option<String>,
    pub date_of_birth: Option<Date>,
}

/// Request body for login.
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Partial profile update. A `password` key anywhere in the payload rejects
/// the whole request; unknown fields (including `email`) are ignored.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub name: Option<String>,
    pub profile_image: Option<String>,
    pub date_of_birth: Option<Date>,
    pub password: Option<String>,
}

/// Public view of an account. Structurally incapable of carrying the hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub profile_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<Date>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            name: a.name,
            email: a.email,
            profile_image: a.profile_image,
            date_of_birth: a.date_of_birth,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Response returned after a successful login. This is the one and only
/// login shape; the client does not need to guess between envelopes.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: AccountResponse,
}

/// Confirmation returned after a successful delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_account() -> Account {
        Account {
            id: Uuid::new_v4(),
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
            profile_image: String::new(),
            date_of_birth: None,
            created_at: datetime!(2025-01-01 00:00:00 UTC),
            updated_at: datetime!(2025-01-01 00:00:00 UTC),
        }
    }

    #[test]
    fn account_row_never_serializes_the_hash() {
        let json = serde_json::to_string(&sample_account()).unwrap();
        assert!(!json.contains("passwordHash"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$2b$"));
    }

    #[test]
    fn account_response_uses_camel_case_and_omits_empty_dob() {
        let response = AccountResponse::from(sample_account());
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("profileImage"));
        assert!(json.contains("createdAt"));
        assert!(!json.contains("dateOfBirth"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn login_response_shape() {
        let response = LoginResponse {
            message: "Login successful".to_string(),
            user: AccountResponse::from(sample_account()),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""message":"Login successful""#));
        assert!(json.contains(r#""user":"#));
        assert!(!json.contains("password"));
    }

    #[test]
    fn update_request_accepts_partial_payloads() {
        let req: UpdateAccountRequest = serde_json::from_str(r#"{"name":"X"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("X"));
        assert!(req.profile_image.is_none());
        assert!(req.password.is_none());
    }
}
