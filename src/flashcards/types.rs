use serde::Serialize;

#[derive(Serialize)]
pub struct FlashcardsResult<'a> {
    pub session: &'a str,
    pub cards: usize,
    pub path: String,
}
