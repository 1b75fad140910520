use crate::adapters::http::{build_client, fetch_text};
use crate::core::{ConfigProvider, ValidatorSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_VALIDATORS_URL: &str =
    "https://cdn.jsdelivr.net/gh/hyperlane-xyz/hyperlane-monorepo/typescript/sdk/src/consts/multisigIsm.ts";

/// Multisig ISM source file served over plain HTTP(S).
pub struct CdnValidatorSource {
    client: Client,
    url: String,
}

impl CdnValidatorSource {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = build_client(config.timeout_seconds())?;
        Ok(Self::with_client(client, config.validators_url()))
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ValidatorSource for CdnValidatorSource {
    async fn fetch_validators_file(&self) -> Result<String> {
        fetch_text(&self.client, &self.url).await
    }
}
