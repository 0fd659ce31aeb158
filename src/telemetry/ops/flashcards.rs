use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Flashcards;

#[derive(Copy, Clone, Debug)]
pub enum Phase { LoadTerms, WriteCsv }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::LoadTerms => "load_terms",
        Phase::WriteCsv => "write_csv",
    }}
    fn span(&self) -> Span { match self {
        Phase::LoadTerms => info_span!("load_terms"),
        Phase::WriteCsv => info_span!("write_csv"),
    }}
}

impl OpMarker for Flashcards {
    const NAME: &'static str = "flashcards";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("flashcards") }
}
