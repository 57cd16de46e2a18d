use sqlx::PgPool;
use uuid::Uuid;

use crate::accounts::repo_types::{Account, AccountPatch, NewAccount};

impl Account {
    /// List all accounts, newest first.
    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, password_hash, profile_image, date_of_birth, created_at, updated_at
            FROM accounts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(accounts)
    }

    /// Find an account by id.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, password_hash, profile_image, date_of_birth, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(account)
    }

    /// Find an account by its normalized email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, password_hash, profile_image, date_of_birth, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(account)
    }

    /// Insert a new account with an already-hashed password.
    pub async fn create(
        db: &PgPool,
        new: &NewAccount,
        password_hash: &str,
    ) -> sqlx::Result<Account> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (name, email, password_hash, profile_image, date_of_birth)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, profile_image, date_of_birth, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(password_hash)
        .bind(&new.profile_image)
        .bind(new.date_of_birth)
        .fetch_one(db)
        .await?;
        Ok(account)
    }

    /// Apply a partial update; only supplied fields change. The password hash
    /// is deliberately not touchable from here.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        patch: &AccountPatch,
    ) -> sqlx::Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET name = COALESCE($2, name),
                profile_image = COALESCE($3, profile_image),
                date_of_birth = COALESCE($4, date_of_birth),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, password_hash, profile_image, date_of_birth, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.profile_image.as_deref())
        .bind(patch.date_of_birth)
        .fetch_optional(db)
        .await?;
        Ok(account)
    }

    /// Delete an account. Returns false when no row had that id.
    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
