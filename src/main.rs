use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod chunker;
mod flashcards;
mod ingest;
mod init;
mod llm;
mod qa;
mod quiz;
mod report;
mod resources;
mod status;
mod store;
mod study_plan;
mod summarize;
mod telemetry;
mod util;
mod vocab;

use llm::openai::{ModelClientConfig, OpenAiClient};

#[derive(Parser)]
#[command(name = "study", about = "Learning-companion pipeline CLI")]
struct Cli {
    /// Path to the session store (defaults to STUDY_DB or study.db)
    #[arg(global = true, long)]
    db: Option<String>,
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Init(init::InitCmd),
    Ingest(ingest::IngestCmd),
    Summarize(summarize::SummarizeCmd),
    Ask(qa::AskCmd),
    Vocab(vocab::VocabCmd),
    Quiz(quiz::QuizCmd),
    Flashcards(flashcards::FlashcardsCmd),
    Plan(study_plan::PlanCmd),
    Resources(resources::ResourcesCmd),
    Report(report::ReportCmd),
    Status(status::StatusCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and STUDY_LOG_FORMAT
    telemetry::config::init_tracing();

    let db_path = store::resolve_db_path(cli.db.clone());
    let create = matches!(cli.command, Commands::Init(_));
    let pool = store::connect(&db_path, create).await?;

    // One model handle for the whole process; commands that talk to the
    // model borrow it.
    let llm = OpenAiClient::new(ModelClientConfig::from_env())?;

    match cli.command {
        Commands::Init(args) => init::run(&pool, args).await?,
        Commands::Ingest(args) => ingest::run(&pool, args).await?,
        Commands::Summarize(args) => summarize::run(&pool, &llm, args).await?,
        Commands::Ask(args) => qa::run(&pool, &llm, args).await?,
        Commands::Vocab(args) => vocab::run(&pool, &llm, args).await?,
        Commands::Quiz(args) => quiz::run(&pool, &llm, args).await?,
        Commands::Flashcards(args) => flashcards::run(&pool, args).await?,
        Commands::Plan(args) => study_plan::run(&pool, &llm, args).await?,
        Commands::Resources(args) => resources::run(&pool, args).await?,
        Commands::Report(args) => report::run(&pool, args).await?,
        Commands::Status(args) => status::run(&pool, args).await?,
    }

    Ok(())
}
