use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Resources;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Wikipedia, Arxiv, Scholar, WriteResources }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Wikipedia => "wikipedia",
        Phase::Arxiv => "arxiv",
        Phase::Scholar => "scholar",
        Phase::WriteResources => "write_resources",
    }}
    fn span(&self) -> Span { match self {
        Phase::Wikipedia => info_span!("wikipedia"),
        Phase::Arxiv => info_span!("arxiv"),
        Phase::Scholar => info_span!("scholar"),
        Phase::WriteResources => info_span!("write_resources"),
    }}
}

impl OpMarker for Resources {
    const NAME: &'static str = "resources";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("resources") }
}
