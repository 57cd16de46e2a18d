use lazy_static::lazy_static;
use regex::Regex;
use tracing::error;
use uuid::Uuid;

use crate::accounts::dto::{RegisterRequest, UpdateAccountRequest};
use crate::accounts::repo_types::{AccountPatch, NewAccount};
use crate::error::ApiError;

/// Fixed bcrypt work factor. Changing it only affects newly created hashes;
/// verification reads the cost out of the stored hash.
pub const HASH_COST: u32 = 10;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Stored when registration does not supply an image; the UI renders its own
/// placeholder for it.
pub const DEFAULT_PROFILE_IMAGE: &str = "";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Lowercase-fold an email into the uniqueness key.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Parse a path id into a store identifier.
pub fn parse_account_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidIdentifier)
}

pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    bcrypt::hash(plain, HASH_COST).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        ApiError::StoreUnavailable
    })
}

pub fn verify_password(plain: &str, hash: &str) -> Result<bool, ApiError> {
    bcrypt::verify(plain, hash).map_err(|e| {
        error!(error = %e, "bcrypt verify error");
        ApiError::StoreUnavailable
    })
}

/// Check a registration payload and normalize it. The password stays plain
/// here; hashing is an explicit separate step in the register handler.
pub fn validate_registration(payload: RegisterRequest) -> Result<NewAccount, ApiError> {
    let name = payload
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::Validation("Name is required".into()))?;

    let email = payload
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::Validation("Email is required".into()))?;
    if !is_valid_email(&email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }

    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::Validation("Password is required".into()))?;
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    Ok(NewAccount {
        name,
        email,
        password,
        profile_image: payload
            .profile_image
            .unwrap_or_else(|| DEFAULT_PROFILE_IMAGE.to_string()),
        date_of_birth: payload.date_of_birth,
    })
}

/// Check an update payload. A `password` key rejects the whole request before
/// anything else is looked at.
pub fn validate_update(payload: UpdateAccountRequest) -> Result<AccountPatch, ApiError> {
    if payload.password.is_some() {
        return Err(ApiError::PasswordUpdateRejected);
    }

    let name = match payload.name {
        Some(n) => {
            let n = n.trim().to_string();
            if n.is_empty() {
                return Err(ApiError::Validation("Name cannot be empty".into()));
            }
            Some(n)
        }
        None => None,
    };

    Ok(AccountPatch {
        name,
        profile_image: payload.profile_image,
        date_of_birth: payload.date_of_birth,
    })
}

#[cfg(test)]
mod password_tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
        assert!(!verify_password(&format!("{}x", password), &hash).expect("verify should not error"));
    }

    #[test]
    fn hash_is_salted_and_carries_the_fixed_cost() {
        let hash = hash_password("secret1").expect("hashing should succeed");
        assert_ne!(hash, "secret1");
        assert!(hash.contains("$10$"), "cost factor must be 10: {hash}");
        // Fresh salt per account: the same password never hashes identically.
        let again = hash_password("secret1").expect("hashing should succeed");
        assert_ne!(hash, again);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, ApiError::StoreUnavailable));
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;
    use time::macros::date;

    fn full_registration() -> RegisterRequest {
        RegisterRequest {
            name: Some("Ann".into()),
            email: Some("Ann@X.com".into()),
            password: Some("secret1".into()),
            profile_image: None,
            date_of_birth: Some(date!(2002 - 07 - 13)),
        }
    }

    #[test]
    fn registration_normalizes_email_to_lowercase() {
        let new = validate_registration(full_registration()).unwrap();
        assert_eq!(new.email, "ann@x.com");
        assert_eq!(new.name, "Ann");
        assert_eq!(new.profile_image, DEFAULT_PROFILE_IMAGE);
        assert_eq!(new.date_of_birth, Some(date!(2002 - 07 - 13)));
    }

    #[test]
    fn registration_requires_name_email_password() {
        let mut req = full_registration();
        req.name = None;
        assert!(matches!(
            validate_registration(req),
            Err(ApiError::Validation(msg)) if msg == "Name is required"
        ));

        let mut req = full_registration();
        req.email = None;
        assert!(matches!(
            validate_registration(req),
            Err(ApiError::Validation(msg)) if msg == "Email is required"
        ));

        let mut req = full_registration();
        req.password = None;
        assert!(matches!(
            validate_registration(req),
            Err(ApiError::Validation(msg)) if msg == "Password is required"
        ));
    }

    #[test]
    fn registration_rejects_short_password_and_bad_email() {
        let mut req = full_registration();
        req.password = Some("five5".into());
        assert!(matches!(
            validate_registration(req),
            Err(ApiError::Validation(msg)) if msg.starts_with("Password must be")
        ));

        let mut req = full_registration();
        req.email = Some("not-an-email".into());
        assert!(matches!(
            validate_registration(req),
            Err(ApiError::Validation(msg)) if msg == "Invalid email"
        ));
    }

    #[test]
    fn update_with_password_is_rejected_entirely() {
        let req = UpdateAccountRequest {
            name: Some("New Name".into()),
            password: Some("newpass".into()),
            ..Default::default()
        };
        assert!(matches!(
            validate_update(req),
            Err(ApiError::PasswordUpdateRejected)
        ));
    }

    #[test]
    fn update_accepts_partial_fields() {
        let req = UpdateAccountRequest {
            name: Some("X".into()),
            ..Default::default()
        };
        let patch = validate_update(req).unwrap();
        assert_eq!(patch.name.as_deref(), Some("X"));
        assert!(patch.profile_image.is_none());
        assert!(patch.date_of_birth.is_none());
    }

    #[test]
    fn update_rejects_blank_name() {
        let req = UpdateAccountRequest {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(
            validate_update(req),
            Err(ApiError::Validation(msg)) if msg == "Name cannot be empty"
        ));
    }

    #[test]
    fn malformed_id_maps_to_invalid_identifier() {
        assert!(matches!(
            parse_account_id("definitely-not-a-uuid"),
            Err(ApiError::InvalidIdentifier)
        ));
        assert!(parse_account_id(&Uuid::new_v4().to_string()).is_ok());
    }
}
