use crate::utils::error::{Result, StoreError};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

const USER_AGENT: &str = concat!("registry-store/", env!("CARGO_PKG_VERSION"));

pub fn build_client(timeout_seconds: u64) -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_seconds))
        .build()?;
    Ok(client)
}

/// Sends the request and returns the body, failing on non-2xx status.
pub async fn send_for_text(request: RequestBuilder, url: &str) -> Result<String> {
    tracing::debug!("GET {}", url);
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        tracing::debug!("GET {} -> {}", url, status);
        return Err(StoreError::HttpStatusError {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}

pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    send_for_text(client.get(url), url).await
}
