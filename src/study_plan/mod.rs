use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use sqlx::SqlitePool;

use crate::llm::openai::{ChatCompletionRequest, LlmClient};
use crate::store;
use crate::telemetry::ops::study_plan::Phase as PlanPhase;
use crate::telemetry::{self};
use crate::vocab;

pub(crate) mod db;
mod types;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Goal {
    Exam,
    Project,
    General,
}

impl Goal {
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Exam => "exam",
            Goal::Project => "project",
            Goal::General => "general understanding",
        }
    }
}

#[derive(Args)]
pub struct PlanCmd {
    /// Topic to plan for; defaults to the session's top vocabulary terms
    #[arg(long)]
    pub topic: Option<String>,
    #[arg(long, default_value = "default")]
    pub session: String,
    /// Daily study budget in hours (clamped to 1..=6)
    #[arg(long, default_value_t = 2)]
    pub hours_per_day: u8,
    #[arg(long, value_enum, default_value_t = Goal::Exam)]
    pub goal: Goal,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

pub async fn run(pool: &SqlitePool, llm: &dyn LlmClient, args: PlanCmd) -> Result<()> {
    let log = telemetry::study_plan();
    let _g = log
        .root_span_kv([
            ("session", args.session.clone()),
            ("hours_per_day", args.hours_per_day.to_string()),
            ("goal", args.goal.as_str().to_string()),
            ("dry_run", args.dry_run.to_string()),
        ])
        .entered();

    let hours = args.hours_per_day.clamp(1, 6);

    let _resolve = log.span(&PlanPhase::ResolveTopic).entered();
    let session_id = store::require_session(pool, &args.session).await?;
    let topic = match &args.topic {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => {
            // Lead terms of the session's vocabulary stand in for a topic.
            let terms = vocab::db::fetch_terms(pool, session_id).await?;
            let lead: Vec<String> = terms.into_iter().take(3).map(|t| t.term).collect();
            if lead.is_empty() {
                anyhow::bail!(
                    "no topic: pass --topic or run `study vocab` first so one can be derived"
                );
            }
            lead.join(", ")
        }
    };
    drop(_resolve);

    if args.dry_run {
        log.info(format!(
            "📝 Plan — session={} topic=\"{topic}\" hours_per_day={hours} goal={}",
            args.session,
            args.goal.as_str()
        ));
        log.info("   Dry run — skipping model call.");
        if telemetry::config::json_mode() {
            let plan = types::PlanPlan {
                session: &args.session,
                topic: &topic,
                hours_per_day: hours,
                goal: args.goal.as_str(),
            };
            log.plan(&plan)?;
        }
        return Ok(());
    }

    let mut request = ChatCompletionRequest::user(plan_prompt(&topic, hours, args.goal))
        .with_max_tokens(850)
        .with_temperature(0.5);
    request.model = args.model.clone();

    let _call = log.span(&PlanPhase::CallModel).entered();
    log.info(format!("🗓️ Planning 7 days of study for \"{topic}\""));
    let response = llm.chat_completion(request).await.context("generate study plan")?;
    drop(_call);

    let content = response.content.trim().to_string();

    let _w = log.span(&PlanPhase::WritePlan).entered();
    db::upsert_plan(pool, session_id, &topic, hours, args.goal.as_str(), &content).await?;
    drop(_w);

    log.info(format!("💡 Study plan:\n{content}"));

    if telemetry::config::json_mode() {
        let result = types::PlanResult {
            session: &args.session,
            topic: &topic,
            hours_per_day: hours,
            goal: args.goal.as_str(),
            plan: &content,
        };
        log.result(&result)?;
    }
    Ok(())
}

fn plan_prompt(topic: &str, hours_per_day: u8, goal: Goal) -> String {
    format!(
        "You are an expert AI academic assistant.\n\
         Create a realistic, technically focused 7-day study plan for the topic: \"{topic}\".\n\
         The learner can dedicate {hours_per_day} hours per day.\n\
         The goal is to prepare for: {}.\n\n\
         - Break it into specific subtopics based on common industry or academic structure.\n\
         - Emphasize practical work (e.g., coding, problem sets, building prototypes).\n\
         - Include self-evaluation like mock tests or concept checks.\n\
         - Use technical terminology relevant to the topic.",
        goal.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::openai::MockClient;

    #[test]
    fn prompt_carries_topic_hours_and_goal() {
        let p = plan_prompt("thermodynamics", 3, Goal::Project);
        assert!(p.contains("\"thermodynamics\""));
        assert!(p.contains("3 hours per day"));
        assert!(p.contains("prepare for: project"));
    }

    #[tokio::test]
    async fn topic_falls_back_to_vocab_terms() {
        let pool = crate::store::memory_pool().await.unwrap();
        let session_id = crate::store::ensure_session(&pool, "default").await.unwrap();
        crate::vocab::db::replace_terms(
            &pool,
            session_id,
            &[
                ("entropy".to_string(), "x".to_string()),
                ("enthalpy".to_string(), "y".to_string()),
            ],
        )
        .await
        .unwrap();

        let mock = MockClient::new();
        mock.push_content("Day 1: read the basics.");

        let args = PlanCmd {
            topic: None,
            session: "default".into(),
            hours_per_day: 9, // clamped down to 6
            goal: Goal::Exam,
            model: None,
            dry_run: false,
        };
        run(&pool, &mock, args).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        let prompt = &calls[0].messages[0].content;
        assert!(prompt.contains("entropy, enthalpy"));
        assert!(prompt.contains("6 hours per day"));

        let stored = db::fetch_plan(&pool, session_id).await.unwrap().unwrap();
        assert_eq!(stored.content, "Day 1: read the basics.");
        assert_eq!(stored.hours_per_day, 6);
    }

    #[tokio::test]
    async fn missing_topic_and_vocab_is_an_error() {
        let pool = crate::store::memory_pool().await.unwrap();
        crate::store::ensure_session(&pool, "default").await.unwrap();
        let mock = MockClient::new();
        let args = PlanCmd {
            topic: None,
            session: "default".into(),
            hours_per_day: 2,
            goal: Goal::Exam,
            model: None,
            dry_run: false,
        };
        assert!(run(&pool, &mock, args).await.is_err());
    }
}
