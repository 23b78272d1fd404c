/*============================================================
  Synavera Project: Syn-Get
  Module: synget_core::shaper
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Shape parsed manifests into the WinGet REST wire records:
    package manifests, installers, locales, search results and
    the server information descriptor.

  Security / Safety Notes:
    Pure transformation; no I/O performed in this module.

  Dependencies:
    serde for JSON serialization.

  Operational Scope:
    Called by the dispatcher after documents are loaded. WinGet
    clients reject unexpected keys, so optional fields appear
    only when the source document carries them.

  Revision History:
    2026-10-17 COD  Authored response shaping layer.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic ordering for reproducible responses
    - Absent fields omitted, never emitted as null
============================================================*/

use serde::Serialize;

use crate::config::PackageIdentity;
use crate::document::{NestedInstallerFile, PackageDocument};

/// Installer record of a version manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Installer {
    pub installer_identifier: String,
    pub architecture: String,
    pub installer_sha256: String,
    pub installer_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested_installer_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested_installer_files: Option<Vec<NestedInstallerFile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer_locale: Option<String>,
}

/// Locale record, used both as `DefaultLocale` and inside `Locales`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Locale {
    pub package_locale: String,
    pub publisher: String,
    pub package_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_support_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moniker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_notes_url: Option<String>,
}

/// One version inside a package manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionManifest {
    pub package_version: String,
    pub default_locale: Locale,
    pub installers: Vec<Installer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locales: Option<Vec<Locale>>,
}

/// Package manifest record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageManifest {
    pub package_identifier: String,
    pub versions: Vec<VersionManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageKey {
    pub package_identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionKey {
    pub package_version: String,
}

/// Manifest search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResult {
    pub package_identifier: String,
    pub package_name: String,
    pub publisher: String,
    pub versions: Vec<VersionKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Authentication {
    pub authentication_type: String,
}

/// Capability descriptor served by `/information`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerInformation {
    pub source_identifier: String,
    pub server_supported_versions: Vec<String>,
    pub authentication: Authentication,
    pub unsupported_package_match_fields: Vec<String>,
    pub required_package_match_fields: Vec<String>,
    pub unsupported_query_parameters: Vec<String>,
    pub required_query_parameters: Vec<String>,
}

/// Installer records of a document, identifiers numbered from 1.
///
/// Entry-level `InstallerType`, `NestedInstallerType` and
/// `NestedInstallerFiles` override the document-level defaults.
pub fn to_installers(doc: &PackageDocument) -> Vec<Installer> {
    let Some(entries) = doc.installers.as_ref() else {
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| Installer {
            installer_identifier: format!(
                "{}-{}-{}",
                doc.package_identifier,
                doc.package_version,
                idx + 1
            ),
            architecture: entry.architecture.clone(),
            installer_sha256: entry.installer_sha256.clone(),
            installer_url: entry.installer_url.clone(),
            installer_type: entry
                .installer_type
                .clone()
                .or_else(|| doc.installer_type.clone()),
            nested_installer_type: entry
                .nested_installer_type
                .clone()
                .or_else(|| doc.nested_installer_type.clone()),
            nested_installer_files: entry
                .nested_installer_files
                .clone()
                .or_else(|| doc.nested_installer_files.clone()),
            scope: entry.scope.clone(),
            installer_locale: entry.installer_locale.clone(),
        })
        .collect()
}

/// The `DefaultLocale` of a document; every version carries one.
pub fn build_default_locale(doc: &PackageDocument, identity: &PackageIdentity) -> Locale {
    let package_locale = doc
        .package_locale
        .clone()
        .unwrap_or_else(|| identity.default_locale.clone());
    locale_for(doc, identity, package_locale)
}

/// Locale list of a document; `None` when the document has no locale block.
pub fn to_locales(doc: &PackageDocument, identity: &PackageIdentity) -> Option<Vec<Locale>> {
    let package_locale = doc.package_locale.clone()?;
    Some(vec![locale_for(doc, identity, package_locale)])
}

fn locale_for(doc: &PackageDocument, identity: &PackageIdentity, package_locale: String) -> Locale {
    Locale {
        package_locale,
        publisher: doc
            .publisher
            .clone()
            .unwrap_or_else(|| identity.publisher.clone()),
        package_name: doc
            .package_name
            .clone()
            .unwrap_or_else(|| identity.default_package_name.clone()),
        publisher_url: doc.publisher_url.clone(),
        publisher_support_url: doc.publisher_support_url.clone(),
        privacy_url: doc.privacy_url.clone(),
        author: doc.author.clone(),
        package_url: doc.package_url.clone(),
        license: doc.license.clone(),
        license_url: doc.license_url.clone(),
        copyright: doc.copyright.clone(),
        copyright_url: doc.copyright_url.clone(),
        short_description: doc.short_description.clone(),
        description: doc.description.clone(),
        moniker: doc.moniker.clone(),
        tags: doc.tags.clone(),
        release_notes: doc.release_notes.clone(),
        release_notes_url: doc.release_notes_url.clone(),
    }
}

/// Version record of a single document.
pub fn version_manifest(doc: &PackageDocument, identity: &PackageIdentity) -> VersionManifest {
    VersionManifest {
        package_version: doc.package_version.clone(),
        default_locale: build_default_locale(doc, identity),
        installers: to_installers(doc),
        locales: to_locales(doc, identity),
    }
}

/// All documents grouped under one package record, in the given order.
pub fn manifest_single(
    package_identifier: &str,
    documents: &[PackageDocument],
    identity: &PackageIdentity,
) -> PackageManifest {
    PackageManifest {
        package_identifier: package_identifier.to_string(),
        versions: documents
            .iter()
            .map(|doc| version_manifest(doc, identity))
            .collect(),
    }
}

/// One package record per document, each holding that document's version.
pub fn manifest_multiple(
    documents: &[PackageDocument],
    identity: &PackageIdentity,
) -> Vec<PackageManifest> {
    documents
        .iter()
        .map(|doc| PackageManifest {
            package_identifier: doc.package_identifier.clone(),
            versions: vec![version_manifest(doc, identity)],
        })
        .collect()
}

/// Search hit for the served package.
pub fn search_result(
    versions: &[String],
    package_name: &str,
    identity: &PackageIdentity,
) -> Vec<SearchResult> {
    vec![SearchResult {
        package_identifier: identity.package_identifier.clone(),
        package_name: package_name.to_string(),
        publisher: identity.publisher.clone(),
        versions: version_keys(versions),
    }]
}

pub fn version_keys(versions: &[String]) -> Vec<VersionKey> {
    versions
        .iter()
        .map(|version| VersionKey {
            package_version: version.clone(),
        })
        .collect()
}

pub fn information_response(identity: &PackageIdentity) -> ServerInformation {
    ServerInformation {
        source_identifier: identity.source_identifier.clone(),
        server_supported_versions: identity.supported_versions.clone(),
        authentication: Authentication {
            authentication_type: "none".into(),
        },
        unsupported_package_match_fields: Vec::new(),
        required_package_match_fields: Vec::new(),
        unsupported_query_parameters: Vec::new(),
        required_query_parameters: Vec::new(),
    }
}
