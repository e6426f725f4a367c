//! Keyword pre-processing: expand URLs in reference input into page text.
//!
//! Input lines that are http(s) URLs are fetched and replaced with the
//! page's visible text; plain lines pass through unchanged. Scrape
//! failures degrade to a marker line rather than failing the caller —
//! the keywords are reference material, not a hard dependency.

use scraper::Html;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Build the HTTP client used for keyword scraping.
pub fn scrape_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .expect("scrape client configuration is valid")
}

/// Check if text is a single http(s) URL.
pub fn is_url(text: &str) -> bool {
    match reqwest::Url::parse(text.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

/// Extract visible text from an HTML document, scripts and styles
/// stripped, one line per text run.
fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut lines = Vec::new();
    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| el.name() == "script" || el.name() == "style")
        });
        if hidden {
            continue;
        }

        let line = text.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }

    lines.join("\n")
}

/// Scrape visible text content from a webpage.
///
/// Returns `None` on any failure; the caller decides the fallback.
pub async fn fetch_page_text(client: &reqwest::Client, url: &str) -> Option<String> {
    let response = match client.get(url.trim()).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(url, error = %e, "failed to fetch URL");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!(url, status = %response.status(), "non-success status while scraping");
        return None;
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(url, error = %e, "failed to read scraped body");
            return None;
        }
    };

    // Parse synchronously; Html is not Send and must not live across awaits.
    let content = extract_text(&body);
    if content.is_empty() {
        return None;
    }

    debug!(url, chars = content.len(), "scraped page text");
    Some(content)
}

/// Process reference keywords.
///
/// If a line is a URL it is scraped and inlined; plain text lines are
/// kept as-is. Mixed input is supported.
pub async fn process_keywords(client: &reqwest::Client, reference_keywords: &str) -> String {
    let mut processed = Vec::new();

    for line in reference_keywords.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if is_url(line) {
            debug!(url = line, "detected URL in keywords");
            match fetch_page_text(client, line).await {
                Some(content) => processed.push(format!("[From URL: {}]\n{}", line, content)),
                None => processed.push(format!("[URL - scraping failed]: {}", line)),
            }
        } else {
            processed.push(line.to_string());
        }
    }

    processed.join("\n\n")
}
