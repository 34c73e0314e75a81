//! Email worker: drains the `emails` and `default` queues.
//!
//! Requires `BLOG_DATABASE_URL`. SMTP settings and the idle poll interval
//! come from the same `BLOG_*` configuration as the API server.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{Context, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use blog_backend::domain::{DispatchOutcome, EmailDispatcher, RetryPolicy};
use blog_backend::outbound::mail::SmtpMailer;
use blog_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use blog_backend::outbound::queue::DieselEmailJobStore;
use blog_backend::settings::AppSettings;

/// Poll until `shutdown` resolves, sleeping `idle` whenever no job is due or
/// the store fails.
async fn run_worker<F>(dispatcher: &EmailDispatcher, idle: Duration, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    loop {
        let outcome = tokio::select! {
            () = &mut shutdown => break,
            outcome = dispatcher.poll_once() => outcome,
        };
        let pause = match outcome {
            Ok(DispatchOutcome::Idle) => true,
            Ok(DispatchOutcome::Delivered(_)) => false,
            Ok(DispatchOutcome::Rescheduled(id)) => {
                warn!(job_id = %id, "email job rescheduled");
                false
            }
            Ok(DispatchOutcome::Failed(id)) => {
                error!(job_id = %id, "email job failed permanently");
                false
            }
            Err(err) => {
                error!(error = %err, "polling email jobs failed");
                true
            }
        };
        if pause {
            tokio::select! {
                () = &mut shutdown => break,
                () = tokio::time::sleep(idle) => {}
            }
        }
    }
    info!("email worker stopped");
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|error| eyre!("loading settings: {error}"))?;
    let database_url = settings
        .database_url
        .as_deref()
        .ok_or_else(|| eyre!("BLOG_DATABASE_URL must be set for the email worker"))?;
    run_pending_migrations(database_url)
        .await
        .wrap_err("running migrations")?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("building connection pool")?;

    let mailer = SmtpMailer::new(&settings.smtp()).wrap_err("building SMTP transport")?;
    let dispatcher = EmailDispatcher::new(
        Arc::new(DieselEmailJobStore::new(pool)),
        Arc::new(mailer),
        Arc::new(DefaultClock),
        RetryPolicy::default(),
    );

    info!("email worker started");
    run_worker(&dispatcher, settings.poll_interval(), async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!(%error, "listening for shutdown signal failed");
        }
    })
    .await;
    Ok(())
}
