use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub source: String,
}

#[derive(Serialize)]
pub struct ResourcesResult<'a> {
    pub session: &'a str,
    pub topic: &'a str,
    pub resources: Vec<Resource>,
}
