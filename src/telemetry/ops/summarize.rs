use tracing::{Span, info_span};

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Summarize;

#[derive(Copy, Clone, Debug)]
pub enum Phase {
    Plan,
    LoadDoc,
    Chunk,
    CallModel,
    WriteSummary,
}

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Plan => "plan",
            Phase::LoadDoc => "load_doc",
            Phase::Chunk => "chunk",
            Phase::CallModel => "call_model",
            Phase::WriteSummary => "write_summary",
        }
    }

    fn span(&self) -> Span {
        match self {
            Phase::Plan => info_span!("plan"),
            Phase::LoadDoc => info_span!("load_doc"),
            Phase::Chunk => info_span!("chunk"),
            Phase::CallModel => info_span!("call_model"),
            Phase::WriteSummary => info_span!("write_summary"),
        }
    }
}

impl OpMarker for Summarize {
    const NAME: &'static str = "summarize";
    type Phase = Phase;

    fn root_span() -> Span {
        info_span!("summarize")
    }
}
