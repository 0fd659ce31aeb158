pub mod config;
pub mod ctx;
pub mod emit;
pub mod ops;

use ctx::LogCtx;

// Factory helpers, one per pipeline op
pub fn init() -> LogCtx<ops::init::Init> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn ingest() -> LogCtx<ops::ingest::Ingest> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn summarize() -> LogCtx<ops::summarize::Summarize> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn ask() -> LogCtx<ops::ask::Ask> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn vocab() -> LogCtx<ops::vocab::Vocab> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn quiz() -> LogCtx<ops::quiz::Quiz> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn flashcards() -> LogCtx<ops::flashcards::Flashcards> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn study_plan() -> LogCtx<ops::study_plan::StudyPlan> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn resources() -> LogCtx<ops::resources::Resources> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn report() -> LogCtx<ops::report::Report> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn status() -> LogCtx<ops::status::Status> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
