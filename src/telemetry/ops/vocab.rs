use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Vocab;

#[derive(Copy, Clone, Debug)]
pub enum Phase { LoadSummary, ExtractTerms, Explain, WriteTerms }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::LoadSummary => "load_summary",
        Phase::ExtractTerms => "extract_terms",
        Phase::Explain => "explain",
        Phase::WriteTerms => "write_terms",
    }}
    fn span(&self) -> Span { match self {
        Phase::LoadSummary => info_span!("load_summary"),
        Phase::ExtractTerms => info_span!("extract_terms"),
        Phase::Explain => info_span!("explain"),
        Phase::WriteTerms => info_span!("write_terms"),
    }}
}

impl OpMarker for Vocab {
    const NAME: &'static str = "vocab";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("vocab") }
}
