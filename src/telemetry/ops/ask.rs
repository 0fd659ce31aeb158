use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Ask;

#[derive(Copy, Clone, Debug)]
pub enum Phase { LoadDoc, Prompt, CallModel, WriteAnswer }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::LoadDoc => "load_doc",
        Phase::Prompt => "prompt",
        Phase::CallModel => "call_model",
        Phase::WriteAnswer => "write_answer",
    }}
    fn span(&self) -> Span { match self {
        Phase::LoadDoc => info_span!("load_doc"),
        Phase::Prompt => info_span!("prompt"),
        Phase::CallModel => info_span!("call_model"),
        Phase::WriteAnswer => info_span!("write_answer"),
    }}
}

impl OpMarker for Ask {
    const NAME: &'static str = "ask";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("ask") }
}
