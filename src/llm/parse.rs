//! Validation of structured model output.
//!
//! Prompts that need structured data ask the model for JSON; the reply is
//! still free text and is treated as untrusted. The payload is located,
//! deserialized, and schema-checked here. Nothing in a model reply is ever
//! interpreted as code.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct McqQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FillBlank {
    pub question: String,
    pub answer: String,
}

/// Parse a JSON array of key terms, keeping at most `top_k` non-empty entries.
pub fn term_list(raw: &str, top_k: usize) -> Result<Vec<String>, ParseError> {
    let payload = json_payload(raw, '[', ']')
        .ok_or_else(|| ParseError::InvalidResponse("no JSON array found".into()))?;
    let terms: Vec<String> = serde_json::from_str(payload)
        .map_err(|e| ParseError::InvalidResponse(format!("term list: {e}")))?;

    let terms: Vec<String> = terms
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .take(top_k)
        .collect();

    if terms.is_empty() {
        return Err(ParseError::InvalidResponse("term list was empty".into()));
    }
    Ok(terms)
}

/// Parse a multiple-choice question object and check its shape.
pub fn mcq(raw: &str) -> Result<McqQuestion, ParseError> {
    let payload = json_payload(raw, '{', '}')
        .ok_or_else(|| ParseError::InvalidResponse("no JSON object found".into()))?;
    let q: McqQuestion = serde_json::from_str(payload)
        .map_err(|e| ParseError::InvalidResponse(format!("mcq: {e}")))?;

    if q.question.trim().is_empty() {
        return Err(ParseError::InvalidResponse("mcq question was empty".into()));
    }
    if q.options.len() < 2 {
        return Err(ParseError::InvalidResponse(format!(
            "mcq needs at least 2 options, got {}",
            q.options.len()
        )));
    }
    let answer = q.answer.trim();
    if answer.is_empty() {
        return Err(ParseError::InvalidResponse("mcq answer was empty".into()));
    }
    if !q.options.iter().any(|o| o.trim().eq_ignore_ascii_case(answer)) {
        return Err(ParseError::InvalidResponse(
            "mcq answer is not one of the options".into(),
        ));
    }
    Ok(q)
}

/// Parse a fill-in-the-blank question object.
pub fn fill_blank(raw: &str) -> Result<FillBlank, ParseError> {
    let payload = json_payload(raw, '{', '}')
        .ok_or_else(|| ParseError::InvalidResponse("no JSON object found".into()))?;
    let q: FillBlank = serde_json::from_str(payload)
        .map_err(|e| ParseError::InvalidResponse(format!("fill-blank: {e}")))?;

    if q.question.trim().is_empty() || q.answer.trim().is_empty() {
        return Err(ParseError::InvalidResponse(
            "fill-blank question and answer must be non-empty".into(),
        ));
    }
    Ok(q)
}

// Models wrap JSON in fences or prose; take the outermost bracketed span.
fn json_payload(raw: &str, open: char, close: char) -> Option<&str> {
    let cleaned = strip_fences(raw);
    let start = cleaned.find(open)?;
    let end = cleaned.rfind(close)?;
    if end < start {
        return None;
    }
    Some(&cleaned[start..=end])
}

fn strip_fences(raw: &str) -> &str {
    let mut t = raw.trim();
    if let Some(rest) = t.strip_prefix("```") {
        t = rest.split_once('\n').map_or("", |(_, body)| body);
        if let Some(body) = t.trim_end().strip_suffix("```") {
            t = body;
        }
    }
    t.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_list_accepts_plain_json() {
        let got = term_list(r#"["gradient descent", "backpropagation"]"#, 10).unwrap();
        assert_eq!(got, vec!["gradient descent", "backpropagation"]);
    }

    #[test]
    fn term_list_accepts_fenced_json() {
        let raw = "```json\n[\"entropy\", \"enthalpy\"]\n```";
        let got = term_list(raw, 10).unwrap();
        assert_eq!(got, vec!["entropy", "enthalpy"]);
    }

    #[test]
    fn term_list_truncates_to_top_k() {
        let got = term_list(r#"["a1", "b2", "c3"]"#, 2).unwrap();
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn term_list_rejects_prose() {
        assert!(term_list("Here are some terms for you!", 10).is_err());
    }

    #[test]
    fn term_list_rejects_empty_array() {
        assert!(term_list("[]", 10).is_err());
        assert!(term_list(r#"["", "  "]"#, 10).is_err());
    }

    #[test]
    fn mcq_accepts_valid_object_with_prose_around_it() {
        let raw = r#"Sure! {"question": "What is an ion?", "options": ["A charged atom", "A neutron", "A photon", "A molecule"], "answer": "A charged atom"}"#;
        let q = mcq(raw).unwrap();
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.answer, "A charged atom");
    }

    #[test]
    fn mcq_rejects_answer_outside_options() {
        let raw = r#"{"question": "Q?", "options": ["A", "B"], "answer": "C"}"#;
        assert!(matches!(mcq(raw), Err(ParseError::InvalidResponse(_))));
    }

    #[test]
    fn mcq_rejects_too_few_options() {
        let raw = r#"{"question": "Q?", "options": ["A"], "answer": "A"}"#;
        assert!(mcq(raw).is_err());
    }

    #[test]
    fn fill_blank_roundtrip() {
        let raw = r#"{"question": "____ is the powerhouse of the cell.", "answer": "Mitochondria"}"#;
        let q = fill_blank(raw).unwrap();
        assert_eq!(q.answer, "Mitochondria");
    }

    #[test]
    fn fill_blank_rejects_blank_fields() {
        assert!(fill_blank(r#"{"question": "", "answer": "x"}"#).is_err());
        assert!(fill_blank(r#"{"question": "q", "answer": " "}"#).is_err());
    }
}
