// src/edgar/client.rs
use crate::utils::error::EdgarError;
use reqwest::header;
use scraper::Html;
use std::time::Duration;

// SEC asks for 10 requests/second max. Be conservative. >100ms delay.
const EDGAR_REQUEST_DELAY_MS: u64 = 150;

/// Creates a reqwest client configured for EDGAR interaction. The SEC
/// fetch policy requires an identifying User-Agent with a contact email.
fn build_edgar_client(agent_email: &str) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(format!("edgar-insights {}", agent_email))
        .build()
}

/// Downloads a filing document from its URL.
/// Includes the mandatory identification headers and basic rate limiting.
pub async fn fetch_document(url: &str, agent_email: &str) -> Result<String, EdgarError> {
    let client = build_edgar_client(agent_email)?;

    tracing::info!("Downloading document from: {}", url);

    // --- Basic Rate Limiting ---
    // One request at a time with a fixed inter-request delay.
    tokio::time::sleep(Duration::from_millis(EDGAR_REQUEST_DELAY_MS)).await;
    // --------------------------

    let response = client
        .get(url)
        .header(header::ACCEPT, "application/xml,text/html,text/plain,*/*")
        .header(header::FROM, agent_email)
        .send()
        .await?; // Propagates reqwest::Error as EdgarError::Network

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        if status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!("Received 403 Forbidden - check User-Agent and rate limits.");
            return Err(EdgarError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::warn!("Received 404 Not Found for URL: {}", url);
            return Err(EdgarError::FilingDocNotFound(url.to_string()));
        }
        return Err(EdgarError::Http(status));
    }

    let body = response.text().await?;
    tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);

    Ok(body)
}

/// Extracts the visible text of a filing page, one text node per line.
/// Script and style contents are skipped. This is the HTML-to-text
/// boundary: no cleaning happens here, the Document constructor owns
/// that.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut lines: Vec<String> = Vec::new();
    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let in_hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .map(|e| matches!(e.name(), "script" | "style"))
                .unwrap_or(false)
        });
        if in_hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_to_text_splits_text_nodes_onto_lines() {
        let html = "<html><body><p>ITEM 1. BUSINESS</p><p>We make widgets.</p></body></html>";
        assert_eq!(html_to_text(html), "ITEM 1. BUSINESS\nWe make widgets.");
    }

    #[test]
    fn html_to_text_drops_scripts_and_blank_nodes() {
        let html = "<html><body><script>var x = 1;</script><p>  Visible  </p></body></html>";
        assert_eq!(html_to_text(html), "Visible");
    }
}
