use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Ingest;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Plan, Resolve, Extract, Transcribe, WriteDoc }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Plan => "plan",
        Phase::Resolve => "resolve",
        Phase::Extract => "extract",
        Phase::Transcribe => "transcribe",
        Phase::WriteDoc => "write_doc",
    }}
    fn span(&self) -> Span { match self {
        Phase::Plan => info_span!("plan"),
        Phase::Resolve => info_span!("resolve"),
        Phase::Extract => info_span!("extract"),
        Phase::Transcribe => info_span!("transcribe"),
        Phase::WriteDoc => info_span!("write_doc"),
    }}
}

impl OpMarker for Ingest {
    const NAME: &'static str = "ingest";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("ingest") }
}
