use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, Unchanged,
};
use std::sync::OnceLock;
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::users;

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Fields to change on an existing user. `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct UserChanges<'a> {
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let rows = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Insert a user. Without a password the account exists but can never
    /// authenticate with a username/password pair.
    pub async fn create(
        &self,
        username: &str,
        password: Option<&str>,
        config: &SecurityConfig,
    ) -> Result<User> {
        let password_hash = match password {
            Some(password) => Some(hash_password_blocking(password, config).await?),
            None => None,
        };

        let now = chrono::Utc::now().to_rfc3339();
        let active = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .with_context(|| format!("Failed to insert user {username}"))?;

        Ok(User::from(model))
    }

    /// Look up a user by username and check the password against the stored hash.
    /// Unknown usernames and wrong passwords both yield `None`. A user that is
    /// missing or has no hash is checked against a placeholder hash, so every
    /// attempt costs one Argon2 verification.
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let stored_hash = user.as_ref().and_then(|u| u.password_hash.clone());
        let password = password.to_string();
        let config = config.clone();

        let is_valid = task::spawn_blocking(move || -> Result<bool> {
            match stored_hash {
                Some(hash) => Ok(verify_password_hash(Some(hash.as_str()), &password)),
                None => {
                    let placeholder = placeholder_hash(&config)?;
                    let _ = verify_password_hash(Some(placeholder), &password);
                    Ok(false)
                }
            }
        })
        .await
        .context("Password verification task panicked")??;

        Ok(user.filter(|_| is_valid).map(User::from))
    }

    /// Apply the given changes. Returns `None` when the user does not exist.
    pub async fn update(
        &self,
        id: i32,
        changes: UserChanges<'_>,
        config: &SecurityConfig,
    ) -> Result<Option<User>> {
        let Some(existing) = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for update")?
        else {
            return Ok(None);
        };

        if changes.username.is_none() && changes.password.is_none() {
            return Ok(Some(User::from(existing)));
        }

        let mut active = users::ActiveModel {
            id: Unchanged(id),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        if let Some(username) = changes.username {
            active.username = Set(username.to_string());
        }

        if let Some(password) = changes.password {
            active.password_hash = Set(Some(hash_password_blocking(password, config).await?));
        }

        match active.update(&self.conn).await {
            Ok(model) => Ok(Some(User::from(model))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to update user {id}")),
        }
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to delete user {id}"))?;

        Ok(result.rows_affected > 0)
    }
}

async fn hash_password_blocking(password: &str, config: &SecurityConfig) -> Result<String> {
    let password = password.to_string();
    let config = config.clone();
    task::spawn_blocking(move || hash_password(&password, Some(&config)))
        .await
        .context("Password hashing task panicked")?
}

static PLACEHOLDER_HASH: OnceLock<String> = OnceLock::new();

/// Hash of a random secret, built once with the configured Argon2 params.
/// Verifying against it costs the same as verifying a real user.
fn placeholder_hash(config: &SecurityConfig) -> Result<&'static str> {
    if let Some(hash) = PLACEHOLDER_HASH.get() {
        return Ok(hash);
    }

    let secret = SaltString::generate(&mut OsRng);
    let hash = hash_password(secret.as_str(), Some(config))?;
    Ok(PLACEHOLDER_HASH.get_or_init(|| hash))
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the argon2 crate defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None, // output length (use default)
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC hash string.
/// A missing or unparsable hash never verifies.
#[must_use]
pub fn verify_password_hash(password_hash: Option<&str>, password: &str) -> bool {
    let Some(password_hash) = password_hash else {
        return false;
    };

    let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
        tracing::warn!("Stored password hash is not in PHC format");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
