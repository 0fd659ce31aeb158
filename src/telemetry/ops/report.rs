use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Report;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Collect, Assemble, WriteFile }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Collect => "collect",
        Phase::Assemble => "assemble",
        Phase::WriteFile => "write_file",
    }}
    fn span(&self) -> Span { match self {
        Phase::Collect => info_span!("collect"),
        Phase::Assemble => info_span!("assemble"),
        Phase::WriteFile => info_span!("write_file"),
    }}
}

impl OpMarker for Report {
    const NAME: &'static str = "report";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("report") }
}
