/*============================================================
  Synavera Project: Syn-Get
  Module: synget_core::document
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Typed model of a singleton WinGet manifest as stored in the
    upstream repository, one document per package version.

  Security / Safety Notes:
    Pure parsing; unknown manifest keys are ignored.

  Dependencies:
    serde + serde_yaml for manifest decoding.

  Operational Scope:
    Produced by the manifest loader, consumed read-only by the
    response shaper for the lifetime of one request.

  Revision History:
    2026-10-17 COD  Authored singleton manifest model.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Absent and empty values kept distinct where it matters
    - Structured parsing with explicit error paths
============================================================*/

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::error::{Result, SynGetError};

/// Parsed upstream document for one package version.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageDocument {
    #[serde(deserialize_with = "scalar")]
    pub package_identifier: String,
    #[serde(deserialize_with = "scalar")]
    pub package_version: String,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub package_name: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub publisher: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub package_locale: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub publisher_url: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub publisher_support_url: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub privacy_url: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub package_url: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub license: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub license_url: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub copyright: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub copyright_url: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub short_description: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub moniker: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar_list")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub release_notes: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub release_notes_url: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub installer_type: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub nested_installer_type: Option<String>,
    #[serde(default)]
    pub nested_installer_files: Option<Vec<NestedInstallerFile>>,
    #[serde(default)]
    pub installers: Option<Vec<InstallerEntry>>,
}

/// One entry of the `Installers` sequence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstallerEntry {
    #[serde(default, deserialize_with = "scalar_or_empty")]
    pub architecture: String,
    #[serde(default, deserialize_with = "scalar_or_empty")]
    pub installer_sha256: String,
    #[serde(default, deserialize_with = "scalar_or_empty")]
    pub installer_url: String,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub installer_type: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub nested_installer_type: Option<String>,
    #[serde(default)]
    pub nested_installer_files: Option<Vec<NestedInstallerFile>>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub scope: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub installer_locale: Option<String>,
}

/// A file inside an archive installer that should be exposed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NestedInstallerFile {
    #[serde(deserialize_with = "scalar")]
    pub relative_file_path: String,
    #[serde(
        default,
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub portable_command_alias: Option<String>,
}

/// Parse the singleton manifest stored in the `directory_version` folder.
///
/// YAML reads `PackageVersion: 1.10` as the float `1.1`; when the version
/// came through as a float the directory name is used instead.
pub fn parse_document(text: &str, directory_version: &str) -> Result<PackageDocument> {
    let value: Value = serde_yaml::from_str(text).map_err(parse_failure)?;
    let float_version = matches!(
        value.get("PackageVersion"),
        Some(Value::Number(number)) if number.is_f64()
    );
    let mut document: PackageDocument = serde_yaml::from_value(value).map_err(parse_failure)?;
    if float_version {
        document.package_version = directory_version.to_string();
    }
    Ok(document)
}

fn parse_failure(err: serde_yaml::Error) -> SynGetError {
    SynGetError::Serialization(format!("Failed to parse manifest: {err}"))
}

/// Render a YAML scalar as text. Manifests routinely carry versions that
/// YAML reads as numbers (`PackageVersion: 1.2`).
fn scalar_text(value: Value) -> std::result::Result<Option<String>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) if text.is_empty() => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        Value::Tagged(tagged) => scalar_text(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => Err("expected a scalar value"),
    }
}

fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    scalar_text(Value::deserialize(deserializer)?)
        .map_err(D::Error::custom)?
        .ok_or_else(|| D::Error::custom("expected a non-empty value"))
}

fn scalar_or_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(optional_scalar(deserializer)?.unwrap_or_default())
}

fn optional_scalar<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    scalar_text(Value::deserialize(deserializer)?).map_err(D::Error::custom)
}

fn optional_scalar_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Vec<String>>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Sequence(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                if let Some(text) = scalar_text(item).map_err(D::Error::custom)? {
                    values.push(text);
                }
            }
            Ok(Some(values))
        }
        _ => Err(D::Error::custom("expected a sequence")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLETON: &str = r#"
PackageIdentifier: d4rko.mpv
PackageVersion: 0.39.0
PackageLocale: en-US
Publisher: D4RKO
PackageName: MPV
License: GPL-2.0
ShortDescription: Media player
Tags: []
InstallerType: zip
NestedInstallerType: portable
NestedInstallerFiles:
  - RelativeFilePath: mpv.exe
    PortableCommandAlias: mpv
Installers:
  - Architecture: x64
    InstallerUrl: https://example.invalid/mpv-x64.zip
    InstallerSha256: ABCDEF
  - Architecture: arm64
    InstallerUrl: https://example.invalid/mpv-arm64.zip
    InstallerSha256: 012345
    InstallerType: portable
    Scope: user
ManifestType: singleton
ManifestVersion: 1.9.0
"#;

    #[test]
    fn parses_singleton_manifest() {
        let doc = parse_document(SINGLETON, "0.39.0").unwrap();
        assert_eq!(doc.package_identifier, "d4rko.mpv");
        assert_eq!(doc.package_version, "0.39.0");
        assert_eq!(doc.package_locale.as_deref(), Some("en-US"));
        assert_eq!(doc.tags, Some(Vec::new()));
        assert!(doc.release_notes.is_none());

        let nested = doc.nested_installer_files.as_ref().unwrap();
        assert_eq!(nested[0].relative_file_path, "mpv.exe");
        assert_eq!(nested[0].portable_command_alias.as_deref(), Some("mpv"));

        let installers = doc.installers.as_ref().unwrap();
        assert_eq!(installers.len(), 2);
        assert_eq!(installers[1].installer_sha256, "012345");
        assert_eq!(installers[1].scope.as_deref(), Some("user"));
        assert!(installers[0].installer_type.is_none());
    }

    #[test]
    fn numeric_scalars_become_text() {
        let doc = parse_document(
            "PackageIdentifier: d4rko.mpv\nPackageVersion: 2\nTags: [mpv, 4k]\n",
            "02",
        )
        .unwrap();
        assert_eq!(doc.package_version, "2");
        assert_eq!(doc.tags, Some(vec!["mpv".to_string(), "4k".to_string()]));
    }

    #[test]
    fn float_versions_keep_the_directory_digits() {
        for (written, directory) in [("1.10", "1.10"), ("0.40", "0.40")] {
            let text = format!("PackageIdentifier: d4rko.mpv\nPackageVersion: {written}\n");
            let doc = parse_document(&text, directory).unwrap();
            assert_eq!(doc.package_version, directory);
        }

        let quoted = parse_document("PackageIdentifier: d4rko.mpv\nPackageVersion: '1.10'\n", "x")
            .unwrap();
        assert_eq!(quoted.package_version, "1.10");
    }

    #[test]
    fn null_and_empty_strings_are_absent() {
        let doc = parse_document(
            "PackageIdentifier: d4rko.mpv\nPackageVersion: 1.0.0\nShortDescription:\nAuthor: ''\n",
            "1.0.0",
        )
        .unwrap();
        assert!(doc.short_description.is_none());
        assert!(doc.author.is_none());
        assert!(doc.tags.is_none());
        assert!(doc.installers.is_none());
    }

    #[test]
    fn missing_version_is_a_parse_failure() {
        let err = parse_document("PackageIdentifier: d4rko.mpv\n", "1.0.0").unwrap_err();
        assert!(matches!(err, SynGetError::Serialization(_)));
    }

    #[test]
    fn malformed_yaml_is_a_parse_failure() {
        assert!(parse_document("PackageIdentifier: [unterminated", "1.0.0").is_err());
    }
}
