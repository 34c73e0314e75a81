//! PostgreSQL-backed email job queue.
//!
//! Jobs live in the `email_jobs` table. Producers insert `pending` rows;
//! workers claim the oldest due row with `FOR UPDATE SKIP LOCKED`, flip it to
//! `running` and push `run_at` out by a lease. A worker that dies mid-job
//! lets the lease lapse and the row becomes claimable again, which gives
//! at-least-once delivery.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use tracing::warn;

use crate::domain::ports::{
    ClaimedJob, EmailJob, EmailJobStore, EmailJobStoreError, EmailQueue, EmailQueueError, JobId,
    QueueName,
};
use crate::outbound::persistence::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, pool_error_message,
};
use crate::outbound::persistence::models::{EmailJobRow, NewEmailJobRow};
use crate::outbound::persistence::schema::email_jobs;
use crate::outbound::persistence::{DbPool, PoolError};

const STATUS_PENDING: &str = "pending";
const STATUS_RUNNING: &str = "running";
const STATUS_DONE: &str = "done";
const STATUS_FAILED: &str = "failed";

/// How long a claimed job stays hidden from other workers.
fn claim_lease() -> TimeDelta {
    TimeDelta::minutes(5)
}

/// Producer adapter implementing [`EmailQueue`].
#[derive(Clone)]
pub struct DieselEmailQueue {
    pool: DbPool,
}

impl DieselEmailQueue {
    /// Create a queue writing to the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmailQueue for DieselEmailQueue {
    async fn enqueue(&self, queue: QueueName, job: &EmailJob) -> Result<JobId, EmailQueueError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| EmailQueueError::unavailable(pool_error_message(error)))?;
        let payload = serde_json::to_value(job)
            .map_err(|error| EmailQueueError::rejected(error.to_string()))?;
        let now = Utc::now();
        let row = NewEmailJobRow {
            queue: queue.as_str(),
            payload,
            status: STATUS_PENDING,
            attempts: 0,
            run_at: now,
            created_at: now,
        };

        diesel::insert_into(email_jobs::table)
            .values(&row)
            .returning(email_jobs::id)
            .get_result::<i64>(&mut conn)
            .await
            .map(JobId)
            .map_err(|error| match classify_diesel_error(error) {
                DieselFailure::Connection(message) => EmailQueueError::unavailable(message),
                DieselFailure::UniqueViolation { .. } => {
                    EmailQueueError::rejected("duplicate job")
                }
                DieselFailure::Query(message) => EmailQueueError::rejected(message),
            })
    }
}

/// Consumer adapter implementing [`EmailJobStore`].
#[derive(Clone)]
pub struct DieselEmailJobStore {
    pool: DbPool,
}

impl DieselEmailJobStore {
    /// Create a store reading from the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EmailJobStoreError {
    EmailJobStoreError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> EmailJobStoreError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => EmailJobStoreError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            EmailJobStoreError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => EmailJobStoreError::query(message),
    }
}

fn attempts_to_db(attempts: u32) -> i32 {
    i32::try_from(attempts).unwrap_or(i32::MAX)
}

fn decode_row(row: EmailJobRow) -> Result<ClaimedJob, EmailJobStoreError> {
    let queue = QueueName::parse(&row.queue).ok_or_else(|| {
        EmailJobStoreError::payload(format!("unknown queue {}", row.queue))
    })?;
    let job: EmailJob = serde_json::from_value(row.payload)
        .map_err(|error| EmailJobStoreError::payload(error.to_string()))?;
    Ok(ClaimedJob {
        id: JobId(row.id),
        queue,
        job,
        attempts: u32::try_from(row.attempts).unwrap_or_default(),
    })
}

#[async_trait]
impl EmailJobStore for DieselEmailJobStore {
    async fn claim_next(
        &self,
        queues: &[QueueName],
        now: DateTime<Utc>,
    ) -> Result<Option<ClaimedJob>, EmailJobStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let names: Vec<&'static str> = queues.iter().map(|queue| queue.as_str()).collect();

        let claimed: Option<EmailJobRow> = conn
            .transaction(|conn| {
                async move {
                    let due: Option<EmailJobRow> = email_jobs::table
                        .filter(email_jobs::queue.eq_any(names))
                        .filter(email_jobs::status.eq_any([STATUS_PENDING, STATUS_RUNNING]))
                        .filter(email_jobs::run_at.le(now))
                        .order_by((email_jobs::run_at, email_jobs::id))
                        .select(EmailJobRow::as_select())
                        .for_update()
                        .skip_locked()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(row) = due else {
                        return Ok(None);
                    };
                    diesel::update(email_jobs::table.find(row.id))
                        .set((
                            email_jobs::status.eq(STATUS_RUNNING),
                            email_jobs::run_at.eq(now + claim_lease()),
                        ))
                        .execute(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(Some(row))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let Some(row) = claimed else {
            return Ok(None);
        };
        let (id, attempts) = (row.id, row.attempts);
        match decode_row(row) {
            Ok(job) => Ok(Some(job)),
            Err(error) => {
                warn!(job_id = id, %error, "undecodable email job; marking failed");
                let attempts = u32::try_from(attempts).unwrap_or_default();
                self.fail(JobId(id), attempts, &error.to_string()).await?;
                Err(error)
            }
        }
    }

    async fn complete(&self, id: JobId) -> Result<(), EmailJobStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(email_jobs::table.find(id.0))
            .set(email_jobs::status.eq(STATUS_DONE))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn reschedule(
        &self,
        id: JobId,
        attempts: u32,
        run_at: DateTime<Utc>,
        last_error: &str,
    ) -> Result<(), EmailJobStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(email_jobs::table.find(id.0))
            .set((
                email_jobs::status.eq(STATUS_PENDING),
                email_jobs::attempts.eq(attempts_to_db(attempts)),
                email_jobs::run_at.eq(run_at),
                email_jobs::last_error.eq(Some(last_error)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn fail(
        &self,
        id: JobId,
        attempts: u32,
        last_error: &str,
    ) -> Result<(), EmailJobStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(email_jobs::table.find(id.0))
            .set((
                email_jobs::status.eq(STATUS_FAILED),
                email_jobs::attempts.eq(attempts_to_db(attempts)),
                email_jobs::last_error.eq(Some(last_error)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
