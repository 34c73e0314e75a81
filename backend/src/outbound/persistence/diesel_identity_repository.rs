//! PostgreSQL-backed `IdentityRepository` implementation using Diesel ORM.
//!
//! Email uniqueness is the `users_email_key` constraint; a concurrent
//! duplicate insert surfaces as `DuplicateEmail` rather than a generic query
//! failure.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{IdentityRepository, IdentityRepositoryError};
use crate::domain::{EmailAddress, Identity, PersonName, StoredIdentity, UserId};

use super::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, pool_error_message,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `IdentityRepository` port.
#[derive(Clone)]
pub struct DieselIdentityRepository {
    pool: DbPool,
}

impl DieselIdentityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IdentityRepositoryError {
    IdentityRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, email: &str) -> IdentityRepositoryError {
    match classify_diesel_error(error) {
        failure if failure.violates("email") => IdentityRepositoryError::duplicate_email(email),
        DieselFailure::Connection(message) => IdentityRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            IdentityRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => IdentityRepositoryError::query(message),
    }
}

fn row_to_stored(row: UserRow) -> Result<StoredIdentity, IdentityRepositoryError> {
    let corrupt = |field: &str| {
        IdentityRepositoryError::query(format!("stored identity has invalid {field}"))
    };
    let identity = Identity {
        id: UserId::from(row.user_id),
        name: PersonName::new("name", row.name).map_err(|_| corrupt("name"))?,
        surname: PersonName::new("surname", row.surname).map_err(|_| corrupt("surname"))?,
        email: EmailAddress::new(row.email).map_err(|_| corrupt("email"))?,
        is_active: row.is_active,
        created_at: row.created_at,
    };
    Ok(StoredIdentity {
        identity,
        credential_hash: row.hashed_password,
    })
}

#[async_trait]
impl IdentityRepository for DieselIdentityRepository {
    async fn insert(&self, stored: &StoredIdentity) -> Result<(), IdentityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let identity = &stored.identity;
        let row = NewUserRow {
            user_id: *identity.id.as_uuid(),
            name: identity.name.as_ref(),
            surname: identity.surname.as_ref(),
            email: identity.email.as_ref(),
            is_active: identity.is_active,
            hashed_password: &stored.credential_hash,
            created_at: identity.created_at,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| map_diesel_error(error, identity.email.as_ref()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredIdentity>, IdentityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(error, email.as_ref()))?;

        row.map(row_to_stored).transpose()
    }
}
