//! API server entry point.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, eyre};
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use blog_backend::domain::TokenService;
use blog_backend::inbound::http::auth_config::{BuildMode, auth_settings_from_env};
use blog_backend::inbound::http::health::HealthState;
use blog_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use blog_backend::settings::AppSettings;

use server::{ServerConfig, create_server};

#[actix_web::main]
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
    let auth = auth_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("loading auth settings")?;
    let tokens = Arc::new(TokenService::new(
        auth.secret.to_vec(),
        settings.token_ttl()?,
        Arc::new(DefaultClock),
    ));
    drop(auth.secret);

    let mut config = ServerConfig::new(settings.bind_addr()?, tokens, auth.cookies);
    if let Some(database_url) = settings.database_url.as_deref() {
        run_pending_migrations(database_url)
            .await
            .wrap_err("running migrations")?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .wrap_err("building connection pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let handle = server.handle();
    let shutdown_health = health_state.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested; draining");
            shutdown_health.mark_draining();
            handle.stop(true).await;
        }
    });

    info!(addr = ?settings.bind_addr.as_deref(), "server started");
    server.await?;
    Ok(())
}
