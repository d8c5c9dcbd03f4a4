use super::types::{
    ContentItem, FileEntry, LanguageBreakdown, ReadmeResponse, RepoResponse, RepositoryContext,
    RepositoryIdentifier, RepositoryMetadata,
};
use crate::config::GitHubSettings;
use crate::error::{AnalyzerError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info, warn};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Read-only client for the GitHub REST endpoints the analysis needs
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: Url,
}

impl GitHubClient {
    /// Creates a client from the GitHub settings
    pub fn new(settings: &GitHubSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&settings.user_agent)
                .map_err(|e| AnalyzerError::Config(format!("Invalid user agent: {}", e)))?,
        );
        if let Some(token) = &settings.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .map_err(|e| AnalyzerError::Config(format!("Invalid GitHub token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let api_base = Url::parse(&settings.api_base)
            .map_err(|e| AnalyzerError::Config(format!("Invalid GitHub API base URL: {}", e)))?;
        if api_base.cannot_be_a_base() {
            return Err(AnalyzerError::Config(format!(
                "Invalid GitHub API base URL: {}",
                settings.api_base
            )));
        }

        Ok(Self { client, api_base })
    }

    /// Collects metadata, languages, root listing and README for a repository
    ///
    /// Only the metadata read can fail the aggregation. The other three reads
    /// degrade to empty values, and are dropped unfinished when the metadata
    /// read fails.
    pub async fn aggregate(&self, id: &RepositoryIdentifier) -> Result<RepositoryContext> {
        info!("Collecting repository context for {}", id);

        let (metadata, languages, root_listing, readme) = tokio::try_join!(
            self.fetch_metadata(id),
            async { Ok::<_, AnalyzerError>(self.fetch_languages(id).await) },
            async { Ok::<_, AnalyzerError>(self.fetch_root_listing(id).await) },
            async { Ok::<_, AnalyzerError>(self.fetch_readme(id).await) },
        )?;

        debug!(
            "Context for {}: {} languages, {} root entries, readme {}",
            id,
            languages.len(),
            root_listing.len(),
            if readme.is_some() { "present" } else { "absent" }
        );

        Ok(RepositoryContext {
            metadata,
            languages,
            root_listing,
            readme,
        })
    }

    /// Reads `/repos/{owner}/{name}`; any failure is fatal
    pub async fn fetch_metadata(&self, id: &RepositoryIdentifier) -> Result<RepositoryMetadata> {
        let response = self.get(&self.repo_url(id, &[])).await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Metadata read for {} failed: HTTP {}", id, status);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    AnalyzerError::RepositoryAccessDenied { status: status.as_u16() }
                }
                _ => AnalyzerError::RepositoryNotFound { status: status.as_u16() },
            });
        }

        let repo: RepoResponse = response.json().await?;
        Ok(repo.into())
    }

    /// Reads `/repos/{owner}/{name}/languages`; failures degrade to an empty map
    pub async fn fetch_languages(&self, id: &RepositoryIdentifier) -> LanguageBreakdown {
        self.fetch_optional(&self.repo_url(id, &["languages"]), "languages")
            .await
            .unwrap_or_default()
    }

    /// Reads `/repos/{owner}/{name}/contents`; failures and non-listing bodies degrade to `[]`
    pub async fn fetch_root_listing(&self, id: &RepositoryIdentifier) -> Vec<FileEntry> {
        let Some(body) = self
            .fetch_optional::<Value>(&self.repo_url(id, &["contents"]), "contents")
            .await
        else {
            return Vec::new();
        };

        match body {
            Value::Array(_) => match serde_json::from_value::<Vec<ContentItem>>(body) {
                Ok(items) => items.into_iter().map(FileEntry::from).collect(),
                Err(e) => {
                    warn!("Root listing for {} has unexpected items: {}", id, e);
                    Vec::new()
                }
            },
            _ => {
                warn!("Root listing for {} is not a directory listing", id);
                Vec::new()
            }
        }
    }

    /// Reads `/repos/{owner}/{name}/readme`; failures and undecodable content degrade to `None`
    pub async fn fetch_readme(&self, id: &RepositoryIdentifier) -> Option<String> {
        let readme: ReadmeResponse = self
            .fetch_optional(&self.repo_url(id, &["readme"]), "readme")
            .await?;

        if let Some(encoding) = readme.encoding.as_deref() {
            if encoding != "base64" {
                warn!("README for {} uses unsupported encoding {}", id, encoding);
                return None;
            }
        }

        match decode_readme(&readme.content) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Failed to decode README for {}: {}", id, e);
                None
            }
        }
    }

    async fn fetch_optional<T: DeserializeOwned>(&self, url: &str, what: &str) -> Option<T> {
        let response = match self.get(url).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request for {} failed: {}", what, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Request for {} returned HTTP {}", what, response.status());
            return None;
        }

        match response.json::<T>().await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Failed to decode {} response: {}", what, e);
                None
            }
        }
    }

    async fn get(&self, url: &str) -> Result<Response> {
        debug!("GET {}", url);
        Ok(self.client.get(url).send().await?)
    }

    /// Owner and name are pushed as single path segments, so `/`, `%` and
    /// dot segments in them cannot leave `/repos/`
    fn repo_url(&self, id: &RepositoryIdentifier, extra: &[&str]) -> String {
        let mut url = self.api_base.clone();
        // Only fails for cannot-be-a-base URLs, which `new` rejects
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", id.owner.as_str(), id.name.as_str()])
                .extend(extra);
        }
        url.to_string()
    }
}

/// Decodes the transport-encoded README body into text
///
/// GitHub wraps the base64 payload at 60 columns, so whitespace is stripped
/// before decoding.
pub fn decode_readme(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| AnalyzerError::Message(format!("invalid base64: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AnalyzerError::Message(format!("invalid UTF-8: {}", e)))
}
