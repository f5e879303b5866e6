//! HTTP document fetcher
//!
//! One reqwest client is built per run and shared by every request: listing
//! pages, article pages, and media downloads. The client carries the fixed
//! request identity, the per-request timeout, and the TLS verification
//! policy from configuration. Redirects are followed; retries are the
//! caller's business.

use crate::config::HttpConfig;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// A fetched document with its post-redirect URL
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Final URL after any redirects, used as the base for resolving
    /// relative links found in the body
    pub final_url: String,

    /// Response body as text
    pub body: String,
}

/// Errors a fetch can fail with
///
/// Both kinds are non-fatal from the fetcher's point of view; whether a
/// failed fetch skips one article or ends the run is decided by the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS, connection, TLS, timeout, or body-read failure
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Http { url: String, status: StatusCode },
}

/// HTTP fetcher shared across one scrape run
pub struct DocumentFetcher {
    client: Client,
}

impl DocumentFetcher {
    /// Builds the fetcher from the HTTP configuration.
    ///
    /// Certificate verification follows `tls-verify`; the default is
    /// insecure-allow because the reference site was always fetched that
    /// way, and the flag exists so a deployment can opt back into
    /// verification.
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(Policy::limited(10))
            .danger_accept_invalid_certs(!config.tls_verify)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Fetches a URL and returns the body text plus the post-redirect URL.
    pub async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status,
            });
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        Ok(RawDocument { final_url, body })
    }

    /// Fetches a URL and returns the raw bytes. Used for media downloads.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        Ok(bytes.to_vec())
    }
}
