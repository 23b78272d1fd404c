/*============================================================
  Synavera Project: Syn-Get
  Module: synget_core::service
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Dispatch resolved routes: consult the upstream, shape the
    documents, and wrap the result in the response envelope.

  Security / Safety Notes:
    Every failure is converted into a JSON error envelope; raw
    failures never reach the client.

  Dependencies:
    tokio (via upstream fan-out), serde for shaped payloads.

  Operational Scope:
    One `Service` is shared by all requests; it holds no
    mutable state.

  Revision History:
    2026-10-17 COD  Authored request dispatcher.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with a single boundary
    - Documented fallbacks only (rate limit, malformed search)
============================================================*/

use std::sync::Arc;

use crate::config::{PackageIdentity, ServiceConfig};
use crate::document::PackageDocument;
use crate::error::{ApiErrorCode, Result, SynGetError};
use crate::logger::Logger;
use crate::response::{ApiResponse, Envelope};
use crate::router::{self, Route};
use crate::search::SearchRequest;
use crate::shaper::{
    information_response, manifest_multiple, manifest_single, search_result, to_installers,
    to_locales, version_keys, version_manifest, PackageKey, SearchResult,
};
use crate::upstream::{list_versions, load_manifest, load_manifests, UpstreamSource};

const UNKNOWN_PACKAGE: &str = "Unknown PackageIdentifier";
const VERSION_NOT_FOUND: &str = "Version not found";
const NO_VERSIONS: &str = "No versions found";
const ROUTE_NOT_FOUND: &str = "Not Found";

/// Request dispatcher over an upstream source.
pub struct Service<S: UpstreamSource> {
    source: S,
    config: Arc<ServiceConfig>,
    logger: Arc<Logger>,
    envelope: Envelope,
}

impl<S: UpstreamSource> Service<S> {
    pub fn new(source: S, config: Arc<ServiceConfig>, logger: Arc<Logger>) -> Self {
        let envelope = Envelope::new(config.server.cache_max_age);
        Self {
            source,
            config,
            logger,
            envelope,
        }
    }

    fn identity(&self) -> &PackageIdentity {
        &self.config.identity
    }

    /// Handle one request. Always yields a well-formed JSON response.
    pub async fn handle(&self, method: &str, path: &str, body: &[u8]) -> ApiResponse {
        let route = router::resolve(method, path);
        let response = match self.execute(&route, body).await {
            Ok(response) => response,
            Err(err) => {
                let code = err.api_code();
                if code == ApiErrorCode::ServerError {
                    self.logger
                        .error("SERVER", format!("{method} {path} failed: {err}"));
                }
                self.envelope.error(code, &err.to_string())
            }
        };
        self.logger.debug(
            "REQUEST",
            format!("{method} {path} -> {}", response.status),
        );
        response
    }

    async fn execute(&self, route: &Route, body: &[u8]) -> Result<ApiResponse> {
        if let Some(id) = route.package_id() {
            if !self.identity().matches(id) {
                return Err(SynGetError::NotFound(UNKNOWN_PACKAGE.into()));
            }
        }

        let identity = self.identity();
        let response = match route {
            Route::Information => self.envelope.data(&information_response(identity)),
            Route::ManifestSearch => self.search(body).await?,
            Route::PackageManifests => {
                let documents = self.load_all().await?;
                self.envelope
                    .data(&manifest_multiple(&documents, identity))
            }
            Route::PackageManifest { .. } => {
                let documents = self.load_all().await?;
                if documents.is_empty() {
                    return Err(SynGetError::NotFound(NO_VERSIONS.into()));
                }
                self.envelope.data(&manifest_single(
                    &identity.package_identifier,
                    &documents,
                    identity,
                ))
            }
            Route::Packages => self.envelope.data(&vec![self.package_key()]),
            Route::Package { .. } => self.envelope.data(&self.package_key()),
            Route::PackageVersions { .. } => {
                let versions = list_versions(&self.source, &self.logger).await?;
                self.envelope.data(&version_keys(&versions))
            }
            Route::PackageVersion { version, .. } => {
                let doc = self.load_version(version).await?;
                self.envelope.data(&version_manifest(&doc, identity))
            }
            Route::Installers { version, .. } => {
                let doc = self.load_version(version).await?;
                self.envelope.data(&to_installers(&doc))
            }
            Route::Locales { version, .. } => {
                let doc = self.load_version(version).await?;
                self.envelope
                    .data(&to_locales(&doc, identity).unwrap_or_default())
            }
            Route::NotFound => self.envelope.not_found(ROUTE_NOT_FOUND),
        };
        Ok(response)
    }

    fn package_key(&self) -> PackageKey {
        PackageKey {
            package_identifier: self.identity().package_identifier.clone(),
        }
    }

    /// Documents of every listed version, newest first.
    async fn load_all(&self) -> Result<Vec<PackageDocument>> {
        let versions = list_versions(&self.source, &self.logger).await?;
        load_manifests(
            &self.source,
            &versions,
            self.config.upstream.max_parallel_requests,
        )
        .await
    }

    async fn load_version(&self, version: &str) -> Result<PackageDocument> {
        match load_manifest(&self.source, version).await {
            Err(SynGetError::Upstream { status, .. }) => {
                self.logger
                    .debug("UPSTREAM", format!("Manifest {version} unavailable ({status})"));
                Err(SynGetError::NotFound(VERSION_NOT_FOUND.into()))
            }
            other => other,
        }
    }

    async fn search(&self, body: &[u8]) -> Result<ApiResponse> {
        let request = SearchRequest::from_body(body);
        let no_results: Vec<SearchResult> = Vec::new();

        let versions = list_versions(&self.source, &self.logger).await?;
        if versions.is_empty() {
            return Ok(self.envelope.data(&no_results));
        }

        let documents = load_manifests(
            &self.source,
            &versions,
            self.config.upstream.max_parallel_requests,
        )
        .await?;
        // The newest document decides; a miss ignores MaximumResults.
        if !documents.first().is_some_and(|doc| request.matches(doc)) {
            return Ok(self.envelope.data(&no_results));
        }

        let identity = self.identity();
        let package_name = documents
            .first()
            .and_then(|doc| doc.package_name.clone())
            .unwrap_or_else(|| identity.default_package_name.clone());
        let mut results = search_result(&versions, &package_name, identity);
        if let Some(limit) = request.limit() {
            results.truncate(limit);
        }
        Ok(self.envelope.data(&results))
    }
}
