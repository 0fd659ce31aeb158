use std::time::Duration;

use anyhow::{Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::types::Resource;

const SUMMARY_ENDPOINT: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";
const LOOKUP_TIMEOUT_SECS: u64 = 5;

#[derive(Deserialize)]
struct WikiSummary {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Deserialize)]
struct ContentUrls {
    #[serde(default)]
    desktop: Option<PageUrl>,
}

#[derive(Deserialize)]
struct PageUrl {
    #[serde(default)]
    page: Option<String>,
}

/// REST summary for a topic; `None` when the page is missing or empty.
pub async fn lookup(client: &Client, topic: &str) -> Result<Option<Resource>> {
    let mut url = Url::parse(SUMMARY_ENDPOINT)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("summary endpoint cannot take a path"))?
        .push(topic); // percent-encodes the topic

    let response = client
        .get(url)
        .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
        .send()
        .await?;
    if !response.status().is_success() {
        return Ok(None);
    }
    let body = response.bytes().await?;
    Ok(parse_summary(&body, topic))
}

pub(crate) fn parse_summary(body: &[u8], topic: &str) -> Option<Resource> {
    let data: WikiSummary = serde_json::from_slice(body).ok()?;
    let summary = data.extract?.trim().to_string();
    if summary.is_empty() {
        return None;
    }
    let link = data
        .content_urls
        .and_then(|c| c.desktop)
        .and_then(|d| d.page)
        .unwrap_or_default();
    Some(Resource {
        title: data.title.unwrap_or_else(|| topic.to_string()),
        link,
        summary,
        source: "Wikipedia".to_string(),
    })
}
