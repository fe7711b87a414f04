//! Read-only JSON client for the Docker Hub search and tags endpoints

use std::time::Duration;

use chrono::DateTime;
use serde::Deserialize;

const REGISTRY_BASE_URL: &str = "https://registry.hub.docker.com/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Page size used when the caller does not specify one.
pub const DEFAULT_TAG_PAGE_SIZE: u32 = 50;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry returned status {0}")]
    Status(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// One entry from the repository search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageSummary {
    #[serde(rename = "repo_name")]
    pub name: String,
    #[serde(rename = "short_description", default)]
    pub description: String,
    #[serde(rename = "star_count", default)]
    pub star_count: i64,
    #[serde(rename = "pull_count", default)]
    pub pull_count: i64,
    #[serde(rename = "is_official", default)]
    pub is_official: bool,
}

/// One entry from the per-repository tags endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageTag {
    pub name: String,
    #[serde(rename = "last_updated", default)]
    pub last_updated: Option<String>,
    #[serde(rename = "full_size", default)]
    pub full_size: i64,
}

impl ImageTag {
    /// `last_updated` rendered as `YYYY-MM-DD HH:MM:SS`, or the raw string
    /// when it does not parse as RFC 3339.
    pub fn formatted_last_updated(&self) -> String {
        match &self.last_updated {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|_| raw.clone()),
            None => "-".to_string(),
        }
    }

    /// `full_size` rendered human-readable (decimal units, file style).
    pub fn formatted_size(&self) -> String {
        format_bytes(self.full_size)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<ImageSummary>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    results: Vec<ImageTag>,
}

/// Prefixes `library/` for single-segment names; Docker Hub files official
/// images under that namespace.
pub fn qualified_repo_name(image: &str) -> String {
    if image.contains('/') {
        image.to_string()
    } else {
        format!("library/{image}")
    }
}

fn format_bytes(bytes: i64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes < 1000 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Docker Hub client.
pub struct RegistryClient {
    client: reqwest::Client,
}

impl RegistryClient {
    pub fn new() -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Free-text image search.
    pub async fn search(&self, query: &str) -> Result<Vec<ImageSummary>, RegistryError> {
        tracing::debug!(query, "searching Docker Hub");
        let url = format!("{REGISTRY_BASE_URL}/search/repositories/");
        let resp = self
            .client
            .get(&url)
            .query(&[("query", query)])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(RegistryError::Status(resp.status()));
        }
        let body: SearchResponse = resp.json().await?;
        Ok(body.results)
    }

    /// Tags for one image, newest first as the registry returns them.
    pub async fn tags(
        &self,
        image: &str,
        page_size: u32,
    ) -> Result<Vec<ImageTag>, RegistryError> {
        let repo = qualified_repo_name(image);
        tracing::debug!(%repo, page_size, "fetching Docker Hub tags");
        let url = format!("{REGISTRY_BASE_URL}/repositories/{repo}/tags");
        let resp = self
            .client
            .get(&url)
            .query(&[("page_size", page_size.to_string())])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(RegistryError::Status(resp.status()));
        }
        let body: TagsResponse = resp.json().await?;
        Ok(body.results)
    }
}
