/// Guide ingestion: fetch the published spreadsheet export and parse it.
///
/// Ingestion is total. Any network or parse failure degrades to a fixed
/// built-in sample set so the caller always has guides to show; errors are
/// logged, never propagated.
use tracing::{info, warn};

use guide_common::fetch;

use crate::error::AppError;
use crate::model::Guide;
use crate::parser;

/// Fetch the remote CSV export and parse it into guides.
///
/// Never fails: transport errors, non-2xx statuses, and unreadable payloads
/// all fall back to [`sample_guides`]. A sheet that parses to zero rows is
/// returned as-is; the fallback covers failures, not empty data.
pub async fn fetch_and_parse_guides(http: &reqwest::Client, csv_url: &str) -> Vec<Guide> {
    match fetch_guides(http, csv_url).await {
        Ok(guides) => {
            info!(count = guides.len(), "loaded guides from remote sheet");
            guides
        }
        Err(e) => {
            warn!(error = %e, "failed to load remote sheet, using built-in samples");
            sample_guides()
        }
    }
}

async fn fetch_guides(http: &reqwest::Client, csv_url: &str) -> Result<Vec<Guide>, AppError> {
    let text = fetch::fetch_text(http, csv_url).await?;
    Ok(parser::parse_guides(&text))
}

/// Fixed demo dataset used whenever the live sheet cannot be loaded.
///
/// Spans multiple categories so degraded mode still demonstrates search.
pub fn sample_guides() -> Vec<Guide> {
    vec![
        Guide {
            id: "1".to_string(),
            title: "How to Reset Your Password".to_string(),
            description: "A step-by-step guide on recovering and resetting your account password securely.".to_string(),
            category: "Account Security".to_string(),
            url: "#".to_string(),
            tags: vec!["password".to_string(), "security".to_string(), "login".to_string()],
        },
        Guide {
            id: "2".to_string(),
            title: "Setting Up 2FA".to_string(),
            description: "Enable two-factor authentication to add an extra layer of security to your profile.".to_string(),
            category: "Account Security".to_string(),
            url: "#".to_string(),
            tags: vec!["2fa".to_string(), "security".to_string(), "mfa".to_string()],
        },
        Guide {
            id: "3".to_string(),
            title: "Understanding Your Billing Invoice".to_string(),
            description: "Learn how to read your monthly statement and understand all charges.".to_string(),
            category: "Billing".to_string(),
            url: "#".to_string(),
            tags: vec!["invoice".to_string(), "money".to_string(), "billing".to_string()],
        },
        Guide {
            id: "4".to_string(),
            title: "Integration with Slack".to_string(),
            description: "Connect our platform with your Slack workspace for real-time notifications.".to_string(),
            category: "Integrations".to_string(),
            url: "#".to_string(),
            tags: vec!["slack".to_string(), "api".to_string(), "connect".to_string()],
        },
        Guide {
            id: "5".to_string(),
            title: "API Rate Limits Explained".to_string(),
            description: "Technical documentation regarding the limitations of our REST API endpoints.".to_string(),
            category: "Developer".to_string(),
            url: "#".to_string(),
            tags: vec!["api".to_string(), "dev".to_string(), "limits".to_string()],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP response on a random local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                // Drain the request headers before answering.
                let mut buf = vec![0u8; 16 * 1024];
                let mut seen = 0;
                loop {
                    match stream.read(&mut buf[seen..]).await {
                        Ok(0) => break,
                        Ok(n) => {
                            seen += n;
                            if buf[..seen].windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
                let response = format!(
                    "{status_line}\r\ncontent-type: text/csv\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        format!("http://{addr}/export.csv")
    }

    /// A local URL that refuses connections.
    async fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/export.csv")
    }

    #[tokio::test]
    async fn successful_fetch_parses_remote_rows() {
        let url = serve_once(
            "HTTP/1.1 200 OK",
            "Title,Description,Link,Category,Tags\nDeploy Guide,Ship it,https://example.com,DevOps,\"deploy, ci\"",
        )
        .await;
        let guides = fetch_and_parse_guides(&reqwest::Client::new(), &url).await;
        assert_eq!(guides.len(), 1);
        assert_eq!(guides[0].id, "guide-1");
        assert_eq!(guides[0].title, "Deploy Guide");
        assert_eq!(guides[0].tags, vec!["deploy", "ci"]);
    }

    #[tokio::test]
    async fn non_success_status_falls_back_to_samples() {
        let url = serve_once("HTTP/1.1 404 Not Found", "gone").await;
        let guides = fetch_and_parse_guides(&reqwest::Client::new(), &url).await;
        let samples = sample_guides();
        assert_eq!(guides.len(), samples.len());
        assert_eq!(guides[0].id, samples[0].id);
        assert_eq!(guides[2].title, "Understanding Your Billing Invoice");
    }

    #[tokio::test]
    async fn connection_refused_falls_back_to_samples() {
        let url = refused_url().await;
        let guides = fetch_and_parse_guides(&reqwest::Client::new(), &url).await;
        assert_eq!(guides.len(), sample_guides().len());
    }

    #[tokio::test]
    async fn empty_sheet_is_not_an_error() {
        let url = serve_once("HTTP/1.1 200 OK", "Title,Description").await;
        let guides = fetch_and_parse_guides(&reqwest::Client::new(), &url).await;
        assert!(guides.is_empty());
    }

    #[test]
    fn sample_guides_have_unique_ids_and_multiple_categories() {
        let samples = sample_guides();
        assert!(samples.len() >= 5);
        let mut ids: Vec<&str> = samples.iter().map(|g| g.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), samples.len());
        let mut categories: Vec<&str> = samples.iter().map(|g| g.category.as_str()).collect();
        categories.sort();
        categories.dedup();
        assert!(categories.len() > 1);
    }
}
