use std::io::Read;
use std::time::Duration;

use async_trait::async_trait;
use backreel_protocol::{Catalog, DescriptionMap, IndexedChunk};
use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::LoaderError;

/// Capability: the static data endpoint.
///
/// The engine only ever issues three GETs; everything else about the
/// transport stays behind this trait so the loader sequencing can be tested
/// against a scripted source.
#[async_trait]
pub trait DataSource {
    /// `GET /data/{series}/{series}.json?d={cache-buster}`
    async fn fetch_catalog(&self, series: &str) -> Result<Catalog, LoaderError>;

    /// `GET /data/{series}/desc/{n}.json?{cache-buster}`
    async fn fetch_indexed_chunk(&self, series: &str, index: u32)
    -> Result<IndexedChunk, LoaderError>;

    /// `GET /data/{series}/desc/{hash}.json.gz` — gzip-compressed JSON map.
    /// Hash-addressed chunks are content-addressed and therefore immutable;
    /// no cache buster.
    async fn fetch_hashed_chunk(
        &self,
        series: &str,
        hash: &str,
    ) -> Result<DescriptionMap, LoaderError>;
}

/// reqwest-backed [`DataSource`].
pub struct HttpDataSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDataSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LoaderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Millisecond timestamp appended to mutable resources so intermediary
    /// caches never serve a stale series payload.
    fn cache_buster() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    async fn get_checked(&self, url: String) -> Result<reqwest::Response, LoaderError> {
        debug!(%url, "fetching");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LoaderError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_catalog(&self, series: &str) -> Result<Catalog, LoaderError> {
        let url = format!(
            "{}/data/{series}/{series}.json?d={}",
            self.base_url,
            Self::cache_buster()
        );
        Ok(self.get_checked(url).await?.json().await?)
    }

    async fn fetch_indexed_chunk(
        &self,
        series: &str,
        index: u32,
    ) -> Result<IndexedChunk, LoaderError> {
        let url = format!(
            "{}/data/{series}/desc/{index}.json?{}",
            self.base_url,
            Self::cache_buster()
        );
        Ok(self.get_checked(url).await?.json().await?)
    }

    async fn fetch_hashed_chunk(
        &self,
        series: &str,
        hash: &str,
    ) -> Result<DescriptionMap, LoaderError> {
        let url = format!("{}/data/{series}/desc/{hash}.json.gz", self.base_url);
        let compressed = self.get_checked(url).await?.bytes().await?;
        let mut json = String::new();
        GzDecoder::new(compressed.as_ref()).read_to_string(&mut json)?;
        Ok(serde_json::from_str(&json)?)
    }
}
