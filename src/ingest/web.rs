use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use super::ExtractError;

pub async fn extract(client: &Client, url: &Url) -> Result<String, ExtractError> {
    let html = client.get(url.clone()).send().await?.text().await?;
    scrape_article(&html).ok_or(ExtractError::EmptySource)
}

pub fn scrape_article(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);

    // try a set of likely article containers first
    let candidates = [
        "article",
        "main",
        "[role=main]",
        "#content",
        "[itemprop=articleBody]",
        ".post-content",
        ".entry-content",
    ];
    for sel in candidates.iter() {
        if let Some(text) = scrape_with_selector(&doc, sel) {
            if text.len() >= 200 {
                return Some(text);
            }
        }
    }

    // fallback: collect all paragraphs
    let p_sel = Selector::parse("p").ok()?;
    let mut out: Vec<String> = Vec::new();
    for p in doc.select(&p_sel) {
        let t = p.text().collect::<String>();
        let s = normalize(&t);
        if !s.is_empty() {
            out.push(s);
        }
    }
    let joined = out.join("\n");
    if joined.trim().is_empty() { None } else { Some(joined) }
}

fn scrape_with_selector(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let node = doc.select(&sel).next()?;
    let text = node.text().collect::<String>();
    let s = normalize(&text);
    if s.trim().is_empty() { None } else { Some(s) }
}

fn normalize(s: &str) -> String {
    // collapse whitespace and trim lines
    let mut out = String::new();
    for line in s.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(trimmed);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_container_preferred() {
        let filler = "Long enough article body text to pass the length gate. ".repeat(5);
        let html = format!(
            "<html><body><nav>menu items</nav><article>{filler}</article></body></html>"
        );
        let got = scrape_article(&html).unwrap();
        assert!(got.contains("article body text"));
        assert!(!got.contains("menu items"));
    }

    #[test]
    fn paragraph_fallback_when_no_container() {
        let html = "<html><body><p>First bit.</p><p>Second bit.</p></body></html>";
        let got = scrape_article(html).unwrap();
        assert_eq!(got, "First bit.\nSecond bit.");
    }

    #[test]
    fn none_when_page_has_no_text() {
        let html = "<html><body><img src=\"x.png\"/></body></html>";
        assert!(scrape_article(html).is_none());
    }
}
