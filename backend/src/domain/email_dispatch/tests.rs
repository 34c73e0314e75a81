//! Tests for the email dispatcher.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MailerError, MockEmailJobStore, MockMailer};
use crate::test_support::MutableClock;
use chrono::TimeDelta;
use rstest::rstest;

fn welcome(attempts: u32) -> ClaimedJob {
    ClaimedJob {
        id: JobId(11),
        queue: QueueName::Emails,
        job: EmailJob::Welcome {
            email: "ada@example.com".to_owned(),
            name: "Ada".to_owned(),
        },
        attempts,
    }
}

fn dispatcher(store: MockEmailJobStore, mailer: MockMailer) -> EmailDispatcher {
    EmailDispatcher::new(
        Arc::new(store),
        Arc::new(mailer),
        Arc::new(MutableClock::fixed()),
        RetryPolicy::default(),
    )
}

#[tokio::test]
async fn idle_when_nothing_is_due() {
    let mut store = MockEmailJobStore::new();
    store.expect_claim_next().return_once(|_, _| Ok(None));

    let outcome = dispatcher(store, MockMailer::new())
        .poll_once()
        .await
        .expect("poll");
    assert_eq!(outcome, DispatchOutcome::Idle);
}

#[tokio::test]
async fn welcome_job_is_sent_and_completed() {
    let mut store = MockEmailJobStore::new();
    store
        .expect_claim_next()
        .return_once(|_, _| Ok(Some(welcome(0))));
    store
        .expect_complete()
        .withf(|id| *id == JobId(11))
        .times(1)
        .return_once(|_| Ok(()));
    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .withf(|email| email.subject == WELCOME_SUBJECT && email.to == "ada@example.com")
        .times(1)
        .return_once(|_| Ok(()));

    let outcome = dispatcher(store, mailer).poll_once().await.expect("poll");
    assert_eq!(outcome, DispatchOutcome::Delivered(JobId(11)));
}

#[tokio::test]
async fn test_job_completes_without_sending() {
    let mut store = MockEmailJobStore::new();
    store.expect_claim_next().return_once(|_, _| {
        Ok(Some(ClaimedJob {
            id: JobId(3),
            queue: QueueName::Default,
            job: EmailJob::Test {
                email: "ops@example.com".to_owned(),
            },
            attempts: 0,
        }))
    });
    store.expect_complete().times(1).return_once(|_| Ok(()));
    let mut mailer = MockMailer::new();
    mailer.expect_send().never();

    let outcome = dispatcher(store, mailer).poll_once().await.expect("poll");
    assert_eq!(outcome, DispatchOutcome::Delivered(JobId(3)));
}

#[rstest]
#[case(0, 1)]
#[case(2, 3)]
#[tokio::test]
async fn failed_send_reschedules_within_budget(#[case] previous: u32, #[case] recorded: u32) {
    let due = MutableClock::fixed().utc() + TimeDelta::seconds(30);
    let mut store = MockEmailJobStore::new();
    store
        .expect_claim_next()
        .return_once(move |_, _| Ok(Some(welcome(previous))));
    store
        .expect_reschedule()
        .withf(move |id, attempts, run_at, last_error| {
            *id == JobId(11)
                && *attempts == recorded
                && *run_at == due
                && last_error.contains("connection refused")
        })
        .times(1)
        .return_once(|_, _, _, _| Ok(()));
    store.expect_complete().never();
    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .return_once(|_| Err(MailerError::transport("connection refused")));

    let outcome = dispatcher(store, mailer).poll_once().await.expect("poll");
    assert_eq!(outcome, DispatchOutcome::Rescheduled(JobId(11)));
}

#[tokio::test]
async fn fourth_failure_marks_job_failed() {
    let mut store = MockEmailJobStore::new();
    store
        .expect_claim_next()
        .return_once(|_, _| Ok(Some(welcome(3))));
    store
        .expect_fail()
        .withf(|id, attempts, _| *id == JobId(11) && *attempts == 4)
        .times(1)
        .return_once(|_, _, _| Ok(()));
    store.expect_reschedule().never();
    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .return_once(|_| Err(MailerError::transport("timeout")));

    let outcome = dispatcher(store, mailer).poll_once().await.expect("poll");
    assert_eq!(outcome, DispatchOutcome::Failed(JobId(11)));
}

#[tokio::test]
async fn store_outage_is_reported() {
    let mut store = MockEmailJobStore::new();
    store
        .expect_claim_next()
        .return_once(|_, _| Err(EmailJobStoreError::connection("refused")));

    let err = dispatcher(store, MockMailer::new())
        .poll_once()
        .await
        .expect_err("outage");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
