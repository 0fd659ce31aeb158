use anyhow::Result;
use clap::Args;
use reqwest::Client;
use sqlx::SqlitePool;

use crate::store;
use crate::telemetry::ops::resources::Phase as ResourcesPhase;
use crate::telemetry::{self};
use crate::vocab;

mod arxiv;
pub(crate) mod db;
mod scholar;
mod types;
mod wikipedia;

pub use types::Resource;

#[derive(Args)]
pub struct ResourcesCmd {
    /// Topic keyword; defaults to the session's first vocabulary term
    pub topic: Option<String>,
    #[arg(long, default_value = "default")]
    pub session: String,
    #[arg(long, default_value_t = 2)]
    pub max_arxiv: usize,
    #[arg(long, default_value_t = 2)]
    pub max_scholar: usize,
}

pub async fn run(pool: &SqlitePool, args: ResourcesCmd) -> Result<()> {
    let log = telemetry::resources();
    let _g = log
        .root_span_kv([
            ("session", args.session.clone()),
            ("topic", format!("{:?}", args.topic)),
        ])
        .entered();

    let session_id = store::require_session(pool, &args.session).await?;
    let topic = match &args.topic {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => {
            let terms = vocab::db::fetch_terms(pool, session_id).await?;
            match terms.into_iter().next() {
                Some(t) => t.term,
                None => anyhow::bail!(
                    "no topic: pass one as an argument or run `study vocab` first"
                ),
            }
        }
    };
    log.info(format!("🔗 Fetching resources for \"{topic}\""));

    let client = Client::new();
    let mut found: Vec<Resource> = Vec::new();

    // Every source keeps the empty-on-failure contract: a failing fetch is a
    // warning and an empty contribution, never an abort.
    {
        let _s = log.span(&ResourcesPhase::Wikipedia).entered();
        match wikipedia::lookup(&client, &topic).await {
            Ok(Some(resource)) => {
                log.info(format!("📘 Wikipedia: {}", resource.summary));
                found.push(resource);
            }
            Ok(None) => log.warn("⚠️  Could not fetch Wikipedia summary."),
            Err(err) => log.warn(format!("⚠️  Wikipedia lookup failed: {err}")),
        }
    }

    {
        let _s = log.span(&ResourcesPhase::Arxiv).entered();
        match arxiv::papers(&client, &topic, args.max_arxiv).await {
            Ok(papers) => found.extend(papers),
            Err(err) => log.warn(format!("⚠️  arXiv query failed: {err}")),
        }
    }

    {
        let _s = log.span(&ResourcesPhase::Scholar).entered();
        match scholar::api_key() {
            Some(key) => match scholar::papers(&client, &key, &topic, args.max_scholar).await {
                Ok(papers) => found.extend(papers),
                Err(err) => log.warn(format!("⚠️  Scholar search failed: {err}")),
            },
            None => log.info("ℹ️  SERPAPI_KEY not set — skipping scholarly search"),
        }
    }

    let _w = log.span(&ResourcesPhase::WriteResources).entered();
    db::replace_resources(pool, session_id, &found).await?;
    drop(_w);

    if found.is_empty() {
        log.warn("❌ No resources found.");
    } else {
        for r in &found {
            log.info(format!("  • {} ({})\n    {}\n    {}", r.title, r.source, r.summary, r.link));
        }
    }

    if telemetry::config::json_mode() {
        let result = types::ResourcesResult {
            session: &args.session,
            topic: &topic,
            resources: found,
        };
        log.result(&result)?;
    }
    Ok(())
}
