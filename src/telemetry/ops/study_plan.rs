use tracing::{Span, info_span};

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct StudyPlan;

#[derive(Copy, Clone, Debug)]
pub enum Phase {
    ResolveTopic,
    CallModel,
    WritePlan,
}

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::ResolveTopic => "resolve_topic",
            Phase::CallModel => "call_model",
            Phase::WritePlan => "write_plan",
        }
    }

    fn span(&self) -> Span {
        match self {
            Phase::ResolveTopic => info_span!("resolve_topic"),
            Phase::CallModel => info_span!("call_model"),
            Phase::WritePlan => info_span!("write_plan"),
        }
    }
}

impl OpMarker for StudyPlan {
    const NAME: &'static str = "plan";
    type Phase = Phase;

    fn root_span() -> Span {
        info_span!("plan")
    }
}
