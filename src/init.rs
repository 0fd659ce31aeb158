use anyhow::Result;
use clap::Args;
use sqlx::SqlitePool;

use crate::telemetry::ops::init::Phase as InitPhase;
use crate::telemetry::{self};

#[derive(Args)]
pub struct InitCmd {}

pub async fn run(pool: &SqlitePool, _args: InitCmd) -> Result<()> {
    let log = telemetry::init();
    let _g = log.root_span().entered();

    // Apply any pending migrations (idempotent)
    let _s = log.span(&InitPhase::Migrate).entered();
    sqlx::migrate!().run(pool).await?;

    log.info("✅ Study store initialized");
    Ok(())
}
