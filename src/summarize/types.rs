use serde::Serialize;

#[derive(Serialize)]
pub struct SummarizePlan<'a> {
    pub session: &'a str,
    pub chunks: usize,
    pub admitted: usize,
    pub filtered: usize,
    pub max_chunk_words: usize,
    pub min_admit_words: usize,
    pub short_input: bool,
    pub admitted_chunk_words: Vec<usize>,
}

#[derive(Serialize)]
pub struct SummarizeResult<'a> {
    pub session: &'a str,
    pub summary: &'a str,
    pub chunks: usize,
    pub filtered: usize,
    pub stored: bool,
}
