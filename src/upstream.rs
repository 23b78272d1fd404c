/*============================================================
  Synavera Project: Syn-Get
  Module: synget_core::upstream
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1
  ------------------------------------------------------------
  Purpose:
    Read the package repository hosted on GitHub: list version
    directories and fetch the singleton manifest of a version.

  Security / Safety Notes:
    Performs read-only HTTPS GET requests. An optional token
    from the environment is sent as a bearer credential only.

  Dependencies:
    reqwest for HTTP, serde for listing decoding, tokio for the
    bounded fan-out, urlencoding for path substitution.

  Operational Scope:
    Supplies the dispatcher with ordered version lists and
    parsed manifest documents.

  Revision History:
    2026-10-17 COD  Implemented GitHub contents/raw client.
  ------------------------------------------------------------
  SSE Principles Observed:
    - No retries; one failed call fails the request
    - Rate limiting surfaces as an empty listing
    - Output order follows the version list, not completion
============================================================*/

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use urlencoding::encode;

use crate::config::{PackageIdentity, UpstreamConfig};
use crate::document::{parse_document, PackageDocument};
use crate::error::{Result, SynGetError};
use crate::logger::Logger;
use crate::versioning::sort_descending;

const RATE_LIMITED: u16 = 403;

/// Entry of the upstream directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: String,
}

impl DirectoryEntry {
    pub fn is_dir(&self) -> bool {
        self.entry_type == "dir"
    }
}

/// Source of version listings and raw manifest text.
///
/// Non-success responses must surface as [`SynGetError::Upstream`] carrying
/// the HTTP status so callers can tell rate limiting from other failures.
pub trait UpstreamSource: Clone + Send + Sync + 'static {
    fn list_directory(&self) -> impl Future<Output = Result<Vec<DirectoryEntry>>> + Send;

    fn fetch_document(&self, version: &str) -> impl Future<Output = Result<String>> + Send;
}

/// GitHub-backed upstream using the contents API and raw file host.
#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    listing_url: String,
    raw_prefix: String,
    package_identifier: String,
}

impl GitHubClient {
    /// Construct a new client from configuration.
    pub fn new(config: &UpstreamConfig, identity: &PackageIdentity) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(token) = config.token.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| SynGetError::Config("GITHUB_TOKEN is not a valid header".into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|err| SynGetError::Network(format!("Failed to build HTTP client: {err}")))?;

        let listing_url = format!(
            "{}/repos/{}/{}/contents/{}",
            config.api_base.trim_end_matches('/'),
            identity.owner,
            identity.repository,
            identity.base_dir
        );
        let raw_prefix = format!(
            "{}/{}/{}/{}/{}",
            config.raw_base.trim_end_matches('/'),
            identity.owner,
            identity.repository,
            identity.branch,
            identity.base_dir
        );

        Ok(Self {
            client,
            listing_url,
            raw_prefix,
            package_identifier: identity.package_identifier.clone(),
        })
    }

    fn document_url(&self, version: &str) -> String {
        format!(
            "{}/{}/{}.yaml",
            self.raw_prefix,
            encode(version),
            self.package_identifier
        )
    }

    async fn get(&self, url: &str, context: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| SynGetError::Network(format!("{context} request failed: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SynGetError::Upstream {
                context: context.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl UpstreamSource for GitHubClient {
    fn list_directory(&self) -> impl Future<Output = Result<Vec<DirectoryEntry>>> + Send {
        async move {
            let response = self.get(&self.listing_url, "GitHub API").await?;
            response.json::<Vec<DirectoryEntry>>().await.map_err(|err| {
                SynGetError::Serialization(format!("Failed to decode directory listing: {err}"))
            })
        }
    }

    fn fetch_document(&self, version: &str) -> impl Future<Output = Result<String>> + Send {
        let url = self.document_url(version);
        async move {
            let context = "GitHub RAW";
            let response = self.get(&url, context).await?;
            response
                .text()
                .await
                .map_err(|err| SynGetError::Network(format!("{context} read failed: {err}")))
        }
    }
}

/// List the published versions, newest first.
///
/// Upstream rate limiting yields an empty list rather than an error.
pub async fn list_versions<S: UpstreamSource>(source: &S, logger: &Logger) -> Result<Vec<String>> {
    let entries = match source.list_directory().await {
        Ok(entries) => entries,
        Err(err) if err.is_upstream_status(RATE_LIMITED) => {
            logger.warn("RATELIMIT", "Directory listing rate limited; serving no versions");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };

    let mut versions: Vec<String> = entries
        .into_iter()
        .filter(DirectoryEntry::is_dir)
        .map(|entry| entry.name)
        .collect();
    sort_descending(&mut versions);
    logger.debug("UPSTREAM", format!("Listed {} versions", versions.len()));
    Ok(versions)
}

/// Fetch and parse the manifest of one version.
pub async fn load_manifest<S: UpstreamSource>(source: &S, version: &str) -> Result<PackageDocument> {
    let text = source.fetch_document(version).await?;
    parse_document(&text, version)
}

/// Fetch several manifests concurrently, returned in the order of `versions`.
///
/// The first failure is returned and the fetches still in flight are aborted.
pub async fn load_manifests<S: UpstreamSource>(
    source: &S,
    versions: &[String],
    max_parallel: usize,
) -> Result<Vec<PackageDocument>> {
    let semaphore = Arc::new(Semaphore::new(max_parallel.max(1)));
    let mut tasks = JoinSet::new();

    for (slot, version) in versions.iter().enumerate() {
        let source = source.clone();
        let semaphore = semaphore.clone();
        let version = version.clone();
        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| SynGetError::Runtime("Manifest semaphore closed".into()))?;
            load_manifest(&source, &version).await.map(|doc| (slot, doc))
        });
    }

    let mut slots: Vec<Option<PackageDocument>> = vec![None; versions.len()];
    while let Some(joined) = tasks.join_next().await {
        let (slot, document) = joined
            .map_err(|err| SynGetError::Runtime(format!("Manifest task failed: {err}")))??;
        slots[slot] = Some(document);
    }
    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
pub mod testing {
    //! In-memory upstream for tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Clone, Default)]
    pub struct MemorySource {
        listing: Arc<Mutex<Option<std::result::Result<Vec<DirectoryEntry>, u16>>>>,
        documents: Arc<Mutex<HashMap<String, String>>>,
        fetches: Arc<Mutex<Vec<String>>>,
    }

    impl MemorySource {
        /// A source whose listing holds one directory per document.
        pub fn with_documents(documents: &[(&str, &str)]) -> Self {
            let source = Self::default();
            let entries = documents
                .iter()
                .map(|(version, _)| DirectoryEntry {
                    name: version.to_string(),
                    entry_type: "dir".into(),
                })
                .collect();
            source.set_listing(Ok(entries));
            {
                let mut store = source.documents.lock().unwrap();
                for (version, text) in documents {
                    store.insert(version.to_string(), text.to_string());
                }
            }
            source
        }

        pub fn failing_listing(status: u16) -> Self {
            let source = Self::default();
            source.set_listing(Err(status));
            source
        }

        pub fn set_listing(&self, listing: std::result::Result<Vec<DirectoryEntry>, u16>) {
            *self.listing.lock().unwrap() = Some(listing);
        }

        pub fn fetched(&self) -> Vec<String> {
            self.fetches.lock().unwrap().clone()
        }
    }

    impl UpstreamSource for MemorySource {
        fn list_directory(&self) -> impl Future<Output = Result<Vec<DirectoryEntry>>> + Send {
            let listing = self.listing.lock().unwrap().clone().unwrap_or(Ok(Vec::new()));
            async move {
                listing.map_err(|status| SynGetError::Upstream {
                    context: "GitHub API".into(),
                    status,
                })
            }
        }

        fn fetch_document(&self, version: &str) -> impl Future<Output = Result<String>> + Send {
            self.fetches.lock().unwrap().push(version.to_string());
            let found = self.documents.lock().unwrap().get(version).cloned();
            async move {
                found.ok_or(SynGetError::Upstream {
                    context: "GitHub RAW".into(),
                    status: 404,
                })
            }
        }
    }

    pub fn manifest(version: &str) -> String {
        format!(
            "PackageIdentifier: d4rko.mpv\nPackageVersion: {version}\nPackageLocale: en-US\n\
             PackageName: MPV\nInstallerType: zip\nInstallers:\n  - Architecture: x64\n    \
             InstallerUrl: https://example.invalid/{version}.zip\n    InstallerSha256: AA\n"
        )
    }
}
