use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Account record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String, // stored lowercase, unique
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash, not exposed in JSON
    pub profile_image: String,
    pub date_of_birth: Option<Date>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A validated registration, ready to be hashed and inserted.
#[derive(Debug)]
pub struct NewAccount {
    pub name: String,
    pub email: String, // already normalized
    pub password: String,
    pub profile_image: String,
    pub date_of_birth: Option<Date>,
}

/// Validated partial update. Absent fields are left untouched; email and
/// password have no update path at all.
#[derive(Debug, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub profile_image: Option<String>,
    pub date_of_birth: Option<Date>,
}
