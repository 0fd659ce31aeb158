use serde::Serialize;

#[derive(Serialize)]
pub struct ReportResult<'a> {
    pub session: &'a str,
    pub path: String,
    pub sections: Vec<String>,
}
