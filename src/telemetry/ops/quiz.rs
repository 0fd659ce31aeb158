use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Quiz;

#[derive(Copy, Clone, Debug)]
pub enum Phase { LoadTerms, Mcq, FillBlank, WriteQuestions }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::LoadTerms => "load_terms",
        Phase::Mcq => "mcq",
        Phase::FillBlank => "fill_blank",
        Phase::WriteQuestions => "write_questions",
    }}
    fn span(&self) -> Span { match self {
        Phase::LoadTerms => info_span!("load_terms"),
        Phase::Mcq => info_span!("mcq"),
        Phase::FillBlank => info_span!("fill_blank"),
        Phase::WriteQuestions => info_span!("write_questions"),
    }}
}

impl OpMarker for Quiz {
    const NAME: &'static str = "quiz";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("quiz") }
}
