use reqwest::StatusCode;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned error: status={status} body={body}")]
    Status { status: StatusCode, body: String },
}

const MAX_ERROR_BODY_BYTES: usize = 8 * 1024;

/// Fetch a text document over HTTP GET.
///
/// Any non-2xx status is an error; the body is captured (capped) so callers
/// can log what the upstream said.
pub async fn fetch_text(http: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let resp = http.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = read_limited_text(resp, MAX_ERROR_BODY_BYTES).await;
        return Err(FetchError::Status { status, body });
    }
    Ok(resp.text().await?)
}

/// Read a response body as text, truncated to `max_bytes`.
pub async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}
