use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::ByteSource;
use crate::error::{Error, Result};

/// Archive bytes fetched over HTTP(S).
///
/// The whole response body is downloaded in one request; page archives are
/// a few tens of megabytes at most, and the viewer needs random access to
/// the full container anyway.
pub struct HttpSource {
    client: Client,
    url: String,
    name: String,
    max_retry: u32,
}

impl HttpSource {
    /// Create a source for the given URL.
    ///
    /// The display name is the last path segment of the URL, falling back
    /// to the full URL when there is none.
    pub fn new(url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Fetch {
                reason: e.to_string(),
            })?;

        let name = url
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(url.as_str())
            .to_string();

        Ok(Self {
            client,
            url,
            name,
            max_retry: 10,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ByteSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let mut retry_count = 0;

        loop {
            let result = self.client.get(&self.url).send().await;

            match result {
                Ok(resp) => {
                    if !resp.status().is_success() {
                        return Err(Error::Fetch {
                            reason: format!("HTTP request failed with status: {}", resp.status()),
                        });
                    }
                    let bytes = resp.bytes().await.map_err(|e| Error::Fetch {
                        reason: e.to_string(),
                    })?;
                    return Ok(bytes.to_vec());
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    retry_count += 1;
                    if retry_count >= self.max_retry {
                        return Err(Error::Fetch {
                            reason: "max retries exceeded".to_string(),
                        });
                    }
                    log::warn!(
                        "connection error, retry {}/{}: {}",
                        retry_count,
                        self.max_retry,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(500 * retry_count as u64)).await;
                }
                Err(e) => {
                    return Err(Error::Fetch {
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
