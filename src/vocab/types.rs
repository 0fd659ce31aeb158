use serde::Serialize;

#[derive(Serialize)]
pub struct VocabPlan<'a> {
    pub session: &'a str,
    pub top_k: usize,
    pub summary_chars: usize,
}

#[derive(Serialize)]
pub struct TermDto {
    pub term: String,
    pub explanation: String,
}

#[derive(Serialize)]
pub struct VocabResult<'a> {
    pub session: &'a str,
    pub terms: Vec<TermDto>,
    pub generic_terms: Vec<String>,
}
