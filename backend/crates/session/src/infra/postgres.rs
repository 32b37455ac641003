//! PostgreSQL Principal Directory
//!
//! Reads the external user store. Expected table:
//!
//! ```sql
//! CREATE TABLE principals (
//!     id              BIGINT PRIMARY KEY,
//!     identifier      TEXT NOT NULL UNIQUE,
//!     email           TEXT UNIQUE,
//!     name            TEXT,
//!     role            SMALLINT NOT NULL DEFAULT 0,
//!     secret_hash     TEXT NOT NULL,
//!     email_confirmed BOOLEAN NOT NULL DEFAULT FALSE
//! );
//! ```

use platform::password::{ClearTextSecret, HashedSecret};
use sqlx::PgPool;

use crate::domain::entity::principal::Principal;
use crate::domain::repository::PrincipalDirectory;
use crate::domain::value_object::{principal_id::PrincipalId, role::Role};
use crate::error::{SessionError, SessionResult};

/// Identifier or email lookup. When one row's identifier equals another
/// row's email, the identifier match wins.
const AUTHENTICATE_SQL: &str = r#"
    SELECT
        id,
        email,
        name,
        role,
        secret_hash,
        email_confirmed
    FROM principals
    WHERE lower(identifier) = lower($1)
       OR lower(email) = lower($1)
    ORDER BY (lower(identifier) = lower($1)) DESC
    LIMIT 1
"#;

/// PostgreSQL-backed principal directory
#[derive(Clone)]
pub struct PgPrincipalDirectory {
    pool: PgPool,
}

impl PgPrincipalDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PrincipalDirectory for PgPrincipalDirectory {
    async fn authenticate(
        &self,
        identifier: &str,
        secret: &ClearTextSecret,
    ) -> SessionResult<Option<Principal>> {
        let row = sqlx::query_as::<_, PrincipalRow>(AUTHENTICATE_SQL)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            HashedSecret::burn(secret);
            return Ok(None);
        };

        let hashed = HashedSecret::from_phc_string(row.secret_hash.clone()).map_err(|e| {
            SessionError::Internal(format!("Invalid secret hash for principal {}: {}", row.id, e))
        })?;

        if !hashed.verify(secret) {
            return Ok(None);
        }

        row.into_principal().map(Some)
    }

    async fn find_by_id(&self, id: PrincipalId) -> SessionResult<Option<Principal>> {
        let row = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT
                id,
                email,
                name,
                role,
                secret_hash,
                email_confirmed
            FROM principals
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_principal()).transpose()
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct PrincipalRow {
    id: i64,
    email: Option<String>,
    name: Option<String>,
    role: i16,
    secret_hash: String,
    email_confirmed: bool,
}

impl PrincipalRow {
    fn into_principal(self) -> SessionResult<Principal> {
        let role = Role::from_id(self.role)
            .ok_or_else(|| SessionError::Internal(format!("Invalid role id: {}", self.role)))?;

        Ok(Principal {
            id: PrincipalId::new(self.id),
            role,
            name: self.name,
            email: self.email,
            email_confirmed: self.email_confirmed,
        })
    }
}
