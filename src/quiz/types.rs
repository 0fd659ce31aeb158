use serde::Serialize;

#[derive(Serialize)]
pub struct QuizPlan<'a> {
    pub session: &'a str,
    pub terms: usize,
}

#[derive(Serialize)]
pub struct QuizResult<'a> {
    pub session: &'a str,
    pub mcq: usize,
    pub fill_blank: usize,
    pub failures: usize,
}
