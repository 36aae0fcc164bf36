// ABOUTME: API credential model, permission levels, and the key store repository trait.
// ABOUTME: Provides in-memory and PostgreSQL implementations plus random key generation.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use tracing::{debug, instrument, warn};

use crate::shared::AppError;

/// Permission level attached to an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Normal,
    Admin,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Permission::Normal => "normal",
            Permission::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Permission::Normal),
            "admin" => Ok(Permission::Admin),
            other => Err(AppError::BadRequest(format!(
                "invalid permission '{}', expected 'normal' or 'admin'",
                other
            ))),
        }
    }
}

/// One stored credential: the key string, its owning user, and permission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKey {
    pub key: String,
    pub user: String,
    pub permission: Permission,
    pub created_at: DateTime<Utc>,
}

/// Generates a random 32-character alphanumeric key.
pub fn generate_key() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Trait for key store operations.
#[async_trait]
pub trait KeyStore {
    /// Inserts a new key; rejects duplicates.
    async fn insert(&self, api_key: &ApiKey) -> Result<(), AppError>;
    /// Looks up a credential by exact key string.
    async fn get(&self, key: &str) -> Result<Option<ApiKey>, AppError>;
}

/// In-memory implementation of the key store for development and testing.
///
/// Data is lost when the process restarts; production deployments use the
/// PostgreSQL store.
pub struct InMemoryKeyStore {
    keys: Mutex<HashMap<String, ApiKey>>,
}

impl Default for InMemoryKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self {
            keys: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory store with pre-populated credentials.
    pub fn with_keys(keys: Vec<ApiKey>) -> Self {
        let mut map = HashMap::new();
        for key in keys {
            map.insert(key.key.clone(), key);
        }
        Self {
            keys: Mutex::new(map),
        }
    }
}

#[async_trait]
impl KeyStore for InMemoryKeyStore {
    #[instrument(skip(self, api_key))]
    async fn insert(&self, api_key: &ApiKey) -> Result<(), AppError> {
        let mut keys = self.keys.lock().unwrap();
        if keys.contains_key(&api_key.key) {
            warn!(user = %api_key.user, "duplicate API key rejected");
            return Err(AppError::BadRequest("API key already exists".to_string()));
        }
        debug!(user = %api_key.user, permission = %api_key.permission, "API key created in memory");
        keys.insert(api_key.key.clone(), api_key.clone());
        Ok(())
    }

    #[instrument(skip_all)]
    async fn get(&self, key: &str) -> Result<Option<ApiKey>, AppError> {
        Ok(self.keys.lock().unwrap().get(key).cloned())
    }
}

/// PostgreSQL implementation of the key store.
pub struct PostgresKeyStore {
    pool: PgPool,
}

impl PostgresKeyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ensures the credential table exists.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS api_keys (
                key TEXT PRIMARY KEY,
                "user" TEXT NOT NULL,
                permission TEXT NOT NULL DEFAULT 'normal',
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )"#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl KeyStore for PostgresKeyStore {
    #[instrument(skip(self, api_key))]
    async fn insert(&self, api_key: &ApiKey) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"INSERT INTO api_keys (key, "user", permission, created_at)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (key) DO NOTHING"#,
        )
        .bind(&api_key.key)
        .bind(&api_key.user)
        .bind(api_key.permission.to_string())
        .bind(api_key.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "failed to insert API key");
            AppError::Store(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(user = %api_key.user, "duplicate API key rejected");
            return Err(AppError::BadRequest("API key already exists".to_string()));
        }
        debug!(user = %api_key.user, permission = %api_key.permission, "API key created in database");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn get(&self, key: &str) -> Result<Option<ApiKey>, AppError> {
        let row = sqlx::query(
            r#"SELECT key, "user", permission, created_at FROM api_keys WHERE key = $1"#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "failed to fetch API key");
            AppError::Store(e.to_string())
        })?;

        Ok(row.map(|row| {
            let permission: String = row.get("permission");
            let permission = permission.parse().unwrap_or_else(|_| {
                warn!(permission = %permission, "unknown stored permission, treating as normal");
                Permission::Normal
            });
            ApiKey {
                key: row.get("key"),
                user: row.get("user"),
                permission,
                created_at: row.get("created_at"),
            }
        }))
    }
}
