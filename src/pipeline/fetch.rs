//! Page fetching: one GET per school page, through the response cache.
//!
//! The cache is transparent. A fresh entry is served without touching the
//! network; a successful response is stored for the next run. Cache I/O
//! problems are logged and otherwise ignored, so a broken cache directory
//! degrades to plain fetching instead of failing the run.

use crate::config::ScrapeConfig;
use crate::error::SkillsError;
use page_cache::PageCache;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The body of one fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub body: String,
    pub from_cache: bool,
}

/// HTTP client, response cache and timeout shared by every request of a run.
pub struct PageFetcher {
    client: reqwest::Client,
    cache: Option<PageCache>,
    timeout_secs: u64,
}

impl PageFetcher {
    /// Build the client and open the cache described by `config`.
    pub fn from_config(config: &ScrapeConfig) -> Result<Self, SkillsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| SkillsError::Internal(format!("Failed to build HTTP client: {e}")))?;
        let cache = config.cache.open();
        if let Some(ref cache) = cache {
            debug!("Response cache: {}", cache.dir().display());
        }

        Ok(Self {
            client,
            cache,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Per-request timeout the client was built with.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn cache(&self) -> Option<&PageCache> {
        self.cache.as_ref()
    }

    /// Fetch `url`, serving it from the cache when possible.
    ///
    /// # Errors
    /// - [`SkillsError::FetchTimeout`] when the request exceeds the timeout
    /// - [`SkillsError::FetchFailed`] on any other transport or body error
    /// - [`SkillsError::HttpStatus`] on a non-success status
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, SkillsError> {
        if let Some(ref cache) = self.cache {
            match cache.load(url) {
                Ok(Some(body)) => {
                    debug!("Cache hit: {}", url);
                    return Ok(FetchedPage {
                        url: url.to_string(),
                        body,
                        from_cache: true,
                    });
                }
                Ok(None) => debug!("Cache miss: {}", url),
                Err(e) => warn!("Ignoring unreadable cache entry for {}: {}", url, e),
            }
        }

        info!("Fetching: {}", url);
        let transport_error = |e: reqwest::Error| {
            if e.is_timeout() {
                SkillsError::FetchTimeout {
                    url: url.to_string(),
                    secs: self.timeout_secs,
                }
            } else {
                SkillsError::FetchFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        debug!("Fetched: url: {} status_code: {}", url, status.as_u16());

        if !status.is_success() {
            return Err(SkillsError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport_error)?;

        if let Some(ref cache) = self.cache {
            if let Err(e) = cache.store(url, &body) {
                warn!("Could not cache {}: {}", url, e);
            }
        }

        Ok(FetchedPage {
            url: url.to_string(),
            body,
            from_cache: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cached_page_skips_the_network() {
        let dir = tempfile::tempdir().unwrap();
        // `.invalid` never resolves, so a network attempt would fail.
        let url = "https://wiki.invalid/Warfare+Skills";
        PageCache::new(dir.path())
            .store(url, "<html>cached</html>")
            .unwrap();

        let config = ScrapeConfig::builder().cache_dir(dir.path()).build().unwrap();
        let fetcher = PageFetcher::from_config(&config).unwrap();
        let page = fetcher.fetch(url).await.unwrap();

        assert!(page.from_cache);
        assert_eq!(page.body, "<html>cached</html>");
        assert_eq!(page.url, url);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_fetch_error() {
        let config = ScrapeConfig::builder()
            .timeout_secs(5)
            .cache_enabled(false)
            .build()
            .unwrap();
        let fetcher = PageFetcher::from_config(&config).unwrap();
        assert!(fetcher.cache().is_none());

        let err = fetcher
            .fetch("https://wiki.invalid/Warfare+Skills")
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                SkillsError::FetchFailed { .. } | SkillsError::FetchTimeout { .. }
            ),
            "got: {err}"
        );
    }

    #[test]
    fn timeout_comes_from_config() {
        let config = ScrapeConfig::builder()
            .timeout_secs(17)
            .cache_enabled(false)
            .build()
            .unwrap();
        let fetcher = PageFetcher::from_config(&config).unwrap();
        assert_eq!(fetcher.timeout_secs(), 17);
    }
}
