use serde::Serialize;

// Plan envelope types
#[derive(Serialize)]
pub struct IngestPlan<'a> {
    pub session: &'a str,
    pub kind: &'static str,
    pub source: Option<String>,
    pub strategies: Option<Vec<&'static str>>,
}

// Apply/result envelope types
#[derive(Serialize)]
pub struct IngestResult<'a> {
    pub session: &'a str,
    pub kind: &'static str,
    pub source: Option<String>,
    pub chars: usize,
    pub words: usize,
}
