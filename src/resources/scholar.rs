use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

use super::types::Resource;

const SEARCH_ENDPOINT: &str = "https://serpapi.com/search";
const SEARCH_TIMEOUT_SECS: u64 = 6;

pub fn api_key() -> Option<String> {
    std::env::var("SERPAPI_KEY").ok().filter(|k| !k.trim().is_empty())
}

#[derive(Deserialize)]
struct ScholarResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

pub async fn papers(client: &Client, key: &str, topic: &str, max: usize) -> Result<Vec<Resource>> {
    if max == 0 {
        return Ok(Vec::new());
    }
    let response = client
        .get(SEARCH_ENDPOINT)
        .timeout(Duration::from_secs(SEARCH_TIMEOUT_SECS))
        .query(&[
            ("engine", "google_scholar"),
            ("q", topic),
            ("api_key", key),
            ("num", "5"),
        ])
        .send()
        .await?;

    let body = response.bytes().await?;
    Ok(parse_response(&body, max))
}

pub(crate) fn parse_response(body: &[u8], max: usize) -> Vec<Resource> {
    let Ok(data) = serde_json::from_slice::<ScholarResponse>(body) else {
        return Vec::new();
    };

    let mut papers = Vec::new();
    for item in data.organic_results {
        let (Some(title), Some(link)) = (item.title, item.link) else {
            continue;
        };
        papers.push(Resource {
            title,
            link,
            summary: item.snippet.unwrap_or_default(),
            source: "Google Scholar".to_string(),
        });
        if papers.len() >= max {
            break;
        }
    }
    papers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_without_links_are_dropped() {
        let body = br#"{
            "organic_results": [
                {"title": "Kept paper", "link": "https://x.test/1", "snippet": "about things"},
                {"title": "No link"},
                {"title": "Also kept", "link": "https://x.test/2"}
            ]
        }"#;
        let papers = parse_response(body, 5);
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].title, "Kept paper");
        assert_eq!(papers[0].summary, "about things");
        assert_eq!(papers[1].summary, "");
        assert_eq!(papers[0].source, "Google Scholar");
    }

    #[test]
    fn max_caps_results_and_bad_json_is_empty() {
        let body = br#"{"organic_results": [
            {"title": "a", "link": "l1"}, {"title": "b", "link": "l2"}, {"title": "c", "link": "l3"}
        ]}"#;
        assert_eq!(parse_response(body, 2).len(), 2);
        assert!(parse_response(b"oops", 2).is_empty());
    }
}
