use anyhow::Result;
use atom_syndication::Feed;
use bytes::Bytes;
use reqwest::Client;
use url::Url;

use crate::util::text;

use super::types::Resource;

const QUERY_ENDPOINT: &str = "http://export.arxiv.org/api/query";
const SUMMARY_CHARS: usize = 200;

pub async fn papers(client: &Client, topic: &str, max: usize) -> Result<Vec<Resource>> {
    if max == 0 {
        return Ok(Vec::new());
    }
    let url = Url::parse_with_params(
        QUERY_ENDPOINT,
        &[
            ("search_query", format!("all:{topic}")),
            ("start", "0".to_string()),
            ("max_results", max.to_string()),
        ],
    )?;

    let body = client.get(url).send().await?.bytes().await?;
    parse_feed(&body, max)
}

pub(crate) fn parse_feed(xml: &Bytes, max: usize) -> Result<Vec<Resource>> {
    let feed = Feed::read_from(&xml[..])?;

    let mut papers = Vec::new();
    for entry in feed.entries().iter().take(max) {
        let title = text::collapse_whitespace(&entry.title().value);
        let link = entry
            .links()
            .first()
            .map(|l| l.href().to_string())
            .unwrap_or_default();
        if title.is_empty() || link.is_empty() {
            continue;
        }
        let summary = entry
            .summary()
            .map(|s| text::collapse_whitespace(&s.value))
            .unwrap_or_default();
        papers.push(Resource {
            title,
            link,
            summary: clip_summary(&summary),
            source: "arXiv".to_string(),
        });
    }
    Ok(papers)
}

fn clip_summary(s: &str) -> String {
    let mut out: String = s.chars().take(SUMMARY_CHARS).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query Results</title>
  <id>http://arxiv.org/api/example</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <id>http://arxiv.org/abs/1234.5678</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <title>Deep Learning
  for Thermodynamics</title>
    <summary>We study neural networks
  applied to entropy estimation.</summary>
    <link href="http://arxiv.org/abs/1234.5678" rel="alternate"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2345.6789</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <title>Second Paper</title>
    <summary>Another abstract.</summary>
    <link href="http://arxiv.org/abs/2345.6789" rel="alternate"/>
  </entry>
</feed>"#;

    #[test]
    fn entries_become_resources_with_collapsed_text() {
        let papers = parse_feed(&Bytes::from_static(FEED.as_bytes()), 5).unwrap();
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].title, "Deep Learning for Thermodynamics");
        assert!(papers[0].summary.starts_with("We study neural networks applied"));
        assert!(papers[0].summary.ends_with("..."));
        assert_eq!(papers[0].link, "http://arxiv.org/abs/1234.5678");
        assert_eq!(papers[0].source, "arXiv");
    }

    #[test]
    fn max_caps_the_entry_count() {
        let papers = parse_feed(&Bytes::from_static(FEED.as_bytes()), 1).unwrap();
        assert_eq!(papers.len(), 1);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_feed(&Bytes::from_static(b"<not-atom/>"), 2).is_err());
    }
}
