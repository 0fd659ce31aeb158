use serde::Serialize;

#[derive(Serialize)]
pub struct PlanPlan<'a> {
    pub session: &'a str,
    pub topic: &'a str,
    pub hours_per_day: u8,
    pub goal: &'static str,
}

#[derive(Serialize)]
pub struct PlanResult<'a> {
    pub session: &'a str,
    pub topic: &'a str,
    pub hours_per_day: u8,
    pub goal: &'static str,
    pub plan: &'a str,
}
