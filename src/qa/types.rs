use serde::Serialize;

#[derive(Serialize)]
pub struct AskPlan<'a> {
    pub session: &'a str,
    pub question: &'a str,
    pub prompt_chars: usize,
    pub truncated: bool,
}

#[derive(Serialize)]
pub struct AskResult<'a> {
    pub session: &'a str,
    pub question: &'a str,
    pub answer: &'a str,
    pub truncated: bool,
    pub usage: Option<UsageDto>,
}

#[derive(Serialize)]
pub struct UsageDto {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}
