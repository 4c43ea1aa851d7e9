use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::auth::password;
use crate::database::manager::StoreError;
use crate::database::models::User;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<sqlx::Error> for AccountError {
    fn from(err: sqlx::Error) -> Self {
        AccountError::Store(StoreError::Sqlx(err))
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

/// Emails compare case-insensitively. One rule for signup and login: store
/// lowercase, look up lowercase, so the casing a caller types never matters.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Account lifecycle: signup, credential checks, deletion.
pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an account with a bcrypt-hashed password. A duplicate email
    /// surfaces as EmailTaken via the unique index, not a pre-check.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        plain_password: &str,
    ) -> Result<User, AccountError> {
        let email = normalize_email(email);
        let password_hash = password::hash_password(plain_password)
            .map_err(|e| AccountError::Hash(e.to_string()))?;

        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(&email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => {
                info!("Registered account {}", user.id);
                Ok(user)
            }
            Err(e) if is_unique_violation(&e) => Err(AccountError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify a login. An unknown email and a wrong password fail with the
    /// same error.
    pub async fn verify_credentials(
        &self,
        email: &str,
        plain_password: &str,
    ) -> Result<User, AccountError> {
        let email = normalize_email(email);
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?;

        match user {
            Some(user) if password::verify_password(plain_password, &user.password_hash) => {
                Ok(user)
            }
            _ => Err(AccountError::InvalidCredentials),
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<User>, AccountError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Delete an account. Owned series and books cascade in storage, which
    /// unhooks or removes the codex records reachable through them.
    pub async fn delete(&self, id: Uuid) -> Result<(), AccountError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        info!("Deleted account {}", id);
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
