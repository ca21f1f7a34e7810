use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::GeoLocation;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::Role;
use crate::domain::principal::ports::PrincipalRepository;
use crate::principal::errors::AuthError;

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

pub struct PostgresPrincipalRepository {
    pool: PgPool,
}

impl PostgresPrincipalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PrincipalRow {
    id: Uuid,
    email: String,
    password_hash: String,
    full_name: String,
    role: String,
    gps_latitude: Option<f64>,
    gps_longitude: Option<f64>,
    enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PrincipalRow> for Principal {
    type Error = AuthError;

    fn try_from(row: PrincipalRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = move |e: &dyn std::fmt::Display| {
            AuthError::DatabaseError(format!("Corrupt principal row {}: {}", id, e))
        };

        Ok(Principal {
            id: PrincipalId(id),
            email: EmailAddress::new(row.email).map_err(|e| corrupt(&e))?,
            password_hash: row.password_hash,
            full_name: row.full_name,
            role: row.role.parse::<Role>().map_err(|e| corrupt(&e))?,
            enabled: row.enabled,
            location: GeoLocation::from_parts(row.gps_latitude, row.gps_longitude)
                .map_err(|e| corrupt(&e))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl PrincipalRepository for PostgresPrincipalRepository {
    async fn create(&self, principal: Principal) -> Result<Principal, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, full_name, role,
                               gps_latitude, gps_longitude, enabled, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(principal.id.0)
        .bind(principal.email.as_str())
        .bind(&principal.password_hash)
        .bind(&principal.full_name)
        .bind(principal.role.as_str())
        .bind(principal.location.map(|l| l.latitude()))
        .bind(principal.location.map(|l| l.longitude()))
        .bind(principal.enabled)
        .bind(principal.created_at)
        .bind(principal.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
                {
                    return AuthError::Conflict(principal.email.to_string());
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(principal)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Principal>, AuthError> {
        let row = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT id, email, password_hash, full_name, role,
                   gps_latitude, gps_longitude, enabled, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(Principal::try_from).transpose()
    }
}
