/*============================================================
  Synavera Project: Syn-Get
  Module: synget_core::search
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Decode manifest search requests and decide whether the
    served package satisfies their query, inclusions and
    filters.

  Security / Safety Notes:
    Request bodies are parsed leniently; malformed input
    degrades to an empty query and is never echoed back.

  Dependencies:
    serde + serde_json for request decoding.

  Operational Scope:
    Used by the `/manifestSearch` handler.

  Revision History:
    2026-10-17 COD  Authored search request matching.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Tolerant input, strict output
============================================================*/

use serde::Deserialize;

use crate::document::PackageDocument;

/// Body of a `POST /manifestSearch` request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SearchRequest {
    pub maximum_results: Option<usize>,
    pub query: Option<RequestMatch>,
    pub inclusions: Vec<PackageMatchFilter>,
    pub filters: Vec<PackageMatchFilter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RequestMatch {
    pub key_word: Option<String>,
    pub match_type: Option<MatchType>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageMatchFilter {
    pub package_match_field: String,
    #[serde(default)]
    pub request_match: RequestMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MatchType {
    Exact,
    CaseInsensitive,
    StartsWith,
    Substring,
    Wildcard,
    Fuzzy,
    FuzzySubstring,
    #[serde(other)]
    Unknown,
}

impl SearchRequest {
    /// Decode a request body, substituting an empty query when it does not parse.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Whether the document satisfies the query, inclusions and filters.
    pub fn matches(&self, doc: &PackageDocument) -> bool {
        let selected = match self.query.as_ref().and_then(RequestMatch::keyword) {
            Some((keyword, match_type)) => {
                MATCH_FIELDS
                    .iter()
                    .any(|field| field_matches(doc, field, keyword, match_type))
            }
            None if !self.inclusions.is_empty() => {
                self.inclusions.iter().any(|filter| filter.matches(doc))
            }
            None => true,
        };
        selected && self.filters.iter().all(|filter| filter.matches(doc))
    }

    /// Positive result limit, if one was requested.
    pub fn limit(&self) -> Option<usize> {
        self.maximum_results.filter(|max| *max > 0)
    }
}

impl RequestMatch {
    fn keyword(&self) -> Option<(&str, MatchType)> {
        let keyword = self.key_word.as_deref().filter(|k| !k.is_empty())?;
        Some((keyword, self.match_type.unwrap_or(MatchType::Substring)))
    }
}

impl PackageMatchFilter {
    fn matches(&self, doc: &PackageDocument) -> bool {
        match self.request_match.keyword() {
            Some((keyword, match_type)) => {
                field_matches(doc, &self.package_match_field, keyword, match_type)
            }
            None => true,
        }
    }
}

const MATCH_FIELDS: &[&str] = &["PackageIdentifier", "PackageName", "Moniker", "Tag"];

fn field_matches(doc: &PackageDocument, field: &str, keyword: &str, match_type: MatchType) -> bool {
    match field {
        "PackageIdentifier" => text_matches(&doc.package_identifier, keyword, match_type),
        "PackageName" => doc
            .package_name
            .as_deref()
            .is_some_and(|name| text_matches(name, keyword, match_type)),
        "Moniker" => doc
            .moniker
            .as_deref()
            .is_some_and(|moniker| text_matches(moniker, keyword, match_type)),
        "Tag" => doc
            .tags
            .iter()
            .flatten()
            .any(|tag| text_matches(tag, keyword, match_type)),
        _ => false,
    }
}

fn text_matches(value: &str, keyword: &str, match_type: MatchType) -> bool {
    let value_lower = value.to_lowercase();
    let keyword_lower = keyword.to_lowercase();
    match match_type {
        MatchType::Exact => value == keyword,
        MatchType::CaseInsensitive => value_lower == keyword_lower,
        MatchType::StartsWith => value_lower.starts_with(&keyword_lower),
        MatchType::Substring
        | MatchType::Wildcard
        | MatchType::Fuzzy
        | MatchType::FuzzySubstring
        | MatchType::Unknown => value_lower.contains(&keyword_lower),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mpv() -> PackageDocument {
        PackageDocument {
            package_identifier: "d4rko.mpv".into(),
            package_version: "0.39.0".into(),
            package_name: Some("MPV".into()),
            moniker: Some("mpv".into()),
            tags: Some(vec!["video".into(), "player".into()]),
            ..PackageDocument::default()
        }
    }

    fn request(body: &str) -> SearchRequest {
        SearchRequest::from_body(body.as_bytes())
    }

    #[test]
    fn empty_or_broken_body_matches_everything() {
        assert!(request("").matches(&mpv()));
        assert!(request("{not json").matches(&mpv()));
        assert!(request("{}").matches(&mpv()));
        assert!(request(r#"{"Query":{"KeyWord":""}}"#).matches(&mpv()));
    }

    #[test]
    fn keyword_matches_identifier_name_and_tags() {
        assert!(request(r#"{"Query":{"KeyWord":"MPV"}}"#).matches(&mpv()));
        assert!(request(r#"{"Query":{"KeyWord":"d4rko"}}"#).matches(&mpv()));
        assert!(request(r#"{"Query":{"KeyWord":"play"}}"#).matches(&mpv()));
        assert!(!request(r#"{"Query":{"KeyWord":"vlc"}}"#).matches(&mpv()));
    }

    #[test]
    fn match_types_are_honoured() {
        let exact = r#"{"Query":{"KeyWord":"D4RKO.MPV","MatchType":"Exact"}}"#;
        assert!(!request(exact).matches(&mpv()));
        let insensitive = r#"{"Query":{"KeyWord":"D4RKO.MPV","MatchType":"CaseInsensitive"}}"#;
        assert!(request(insensitive).matches(&mpv()));
        let prefix = r#"{"Query":{"KeyWord":"mp","MatchType":"StartsWith"}}"#;
        assert!(request(prefix).matches(&mpv()));
        let infix = r#"{"Query":{"KeyWord":"rko.m","MatchType":"StartsWith"}}"#;
        assert!(!request(infix).matches(&mpv()));
    }

    #[test]
    fn inclusions_apply_without_query() {
        let hit = r#"{"Inclusions":[{"PackageMatchField":"PackageIdentifier",
            "RequestMatch":{"KeyWord":"d4rko.mpv","MatchType":"CaseInsensitive"}}]}"#;
        assert!(request(hit).matches(&mpv()));
        let miss = r#"{"Inclusions":[{"PackageMatchField":"ProductCode",
            "RequestMatch":{"KeyWord":"d4rko.mpv"}}]}"#;
        assert!(!request(miss).matches(&mpv()));
    }

    #[test]
    fn every_filter_must_match() {
        let body = r#"{"Query":{"KeyWord":"mpv"},
            "Filters":[{"PackageMatchField":"Tag","RequestMatch":{"KeyWord":"audio","MatchType":"Exact"}}]}"#;
        assert!(!request(body).matches(&mpv()));
        let body = r#"{"Query":{"KeyWord":"mpv"},
            "Filters":[{"PackageMatchField":"Tag","RequestMatch":{"KeyWord":"video","MatchType":"Exact"}}]}"#;
        assert!(request(body).matches(&mpv()));
    }

    #[test]
    fn unknown_match_type_falls_back_to_substring() {
        let body = r#"{"Query":{"KeyWord":"MP","MatchType":"Regex"}}"#;
        assert!(request(body).matches(&mpv()));
    }

    #[test]
    fn zero_limit_means_unlimited() {
        assert_eq!(request(r#"{"MaximumResults":0}"#).limit(), None);
        assert_eq!(request(r#"{"MaximumResults":5}"#).limit(), Some(5));
        assert_eq!(request("{}").limit(), None);
    }
}
