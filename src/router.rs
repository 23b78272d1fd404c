/*============================================================
  Synavera Project: Syn-Get
  Module: synget_core::router
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Normalise request methods and paths and resolve them to a
    route of the WinGet REST surface.

  Security / Safety Notes:
    Path segments are matched verbatim and handed on as data;
    no filesystem or URL is derived from them here.

  Dependencies:
    None beyond std.

  Operational Scope:
    Called once per request by the dispatcher. Clients that
    prefix paths with `/api` or a protocol version such as
    `/v1.9` reach the same routes as unprefixed clients.

  Revision History:
    2026-10-17 COD  Authored route table and normaliser.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Stateless, deterministic resolution
    - First match wins, in declared precedence order
============================================================*/

/// Request method after normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other,
}

/// Resolved route of the REST surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Information,
    ManifestSearch,
    PackageManifests,
    PackageManifest { id: String },
    Packages,
    Package { id: String },
    PackageVersions { id: String },
    PackageVersion { id: String, version: String },
    Installers { id: String, version: String },
    Locales { id: String, version: String },
    NotFound,
}

impl Route {
    /// Package identifier named by the path, if the route has one.
    pub fn package_id(&self) -> Option<&str> {
        match self {
            Route::PackageManifest { id }
            | Route::Package { id }
            | Route::PackageVersions { id }
            | Route::PackageVersion { id, .. }
            | Route::Installers { id, .. }
            | Route::Locales { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// `HEAD` routes like `GET`; the server boundary drops the body.
pub fn normalize_method(method: &str) -> Method {
    if method.eq_ignore_ascii_case("GET") || method.eq_ignore_ascii_case("HEAD") {
        Method::Get
    } else if method.eq_ignore_ascii_case("POST") {
        Method::Post
    } else {
        Method::Other
    }
}

const API_PREFIX: &str = "/api";

/// Strip trailing slashes, then any `/api` and `/v<digits>[.<digits>]`
/// leading segments. Normalising a normalised path is a no-op.
pub fn normalize_path(path: &str) -> String {
    let mut current = trim_trailing(path);
    loop {
        let next = strip_leading_segment(current, |segment| segment == &API_PREFIX[1..])
            .or_else(|| strip_leading_segment(current, is_version_segment));
        match next {
            Some(rest) => current = rest,
            None => break,
        }
    }
    if current.is_empty() {
        "/".to_string()
    } else {
        current.to_string()
    }
}

fn trim_trailing(path: &str) -> &str {
    path.trim_end_matches('/')
}

/// Remove the first segment when `accept` holds, returning what follows it
/// (empty when the segment was the whole path).
fn strip_leading_segment(path: &str, accept: impl Fn(&str) -> bool) -> Option<&str> {
    let body = path.strip_prefix('/')?;
    let (segment, rest) = match body.find('/') {
        Some(idx) => (&body[..idx], &body[idx..]),
        None => (body, ""),
    };
    if accept(segment) {
        Some(rest)
    } else {
        None
    }
}

fn is_version_segment(segment: &str) -> bool {
    let Some(number) = segment.strip_prefix('v') else {
        return false;
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match number.split_once('.') {
        Some((major, minor)) => all_digits(major) && all_digits(minor),
        None => all_digits(number),
    }
}

/// Resolve a raw method and path to a route.
pub fn resolve(method: &str, path: &str) -> Route {
    let method = normalize_method(method);
    let path = normalize_path(path);
    let segments: Vec<&str> = if path == "/" {
        Vec::new()
    } else {
        path[1..].split('/').collect()
    };
    route_for(method, &segments)
}

fn route_for(method: Method, segments: &[&str]) -> Route {
    use Method::{Get, Post};

    match (method, segments) {
        (Get, []) | (Get, ["information"]) => Route::Information,
        (Post, ["manifestSearch"]) | (Get, ["manifestSearch"]) => Route::ManifestSearch,
        (Get, ["packageManifests"]) => Route::PackageManifests,
        (Get, ["packageManifests", id]) => Route::PackageManifest { id: id.to_string() },
        (Get, ["packages"]) => Route::Packages,
        (Get, ["packages", id]) => Route::Package { id: id.to_string() },
        (Get, ["packages", id, "versions"]) => Route::PackageVersions { id: id.to_string() },
        (Get, ["packages", id, "versions", version]) => Route::PackageVersion {
            id: id.to_string(),
            version: version.to_string(),
        },
        (Get, ["packages", id, "versions", version, "installers"]) => Route::Installers {
            id: id.to_string(),
            version: version.to_string(),
        },
        (Get, ["packages", id, "versions", version, "locales"]) => Route::Locales {
            id: id.to_string(),
            version: version.to_string(),
        },
        _ => Route::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_normalise_to_the_same_path() {
        assert_eq!(normalize_path("/packages"), "/packages");
        assert_eq!(normalize_path("/api/packages"), "/packages");
        assert_eq!(normalize_path("/v1.9/packages"), "/packages");
        assert_eq!(normalize_path("/api/v1.9/packages/"), "/packages");
        assert_eq!(normalize_path("/v2/packages//"), "/packages");
    }

    #[test]
    fn bare_prefixes_become_root() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("///"), "/");
        assert_eq!(normalize_path("/api"), "/");
        assert_eq!(normalize_path("/api/"), "/");
        assert_eq!(normalize_path("/v1.9"), "/");
    }

    #[test]
    fn normalisation_is_idempotent() {
        for path in [
            "/api/api/packages",
            "/v1.9/api/information/",
            "/apis/packages",
            "/v1.9.0/packages",
            "/vx/packages",
            "/packages/d4rko.mpv/versions/1.0/installers",
        ] {
            let once = normalize_path(path);
            assert_eq!(normalize_path(&once), once, "path {path}");
        }
    }

    #[test]
    fn lookalike_segments_are_kept() {
        assert_eq!(normalize_path("/apis/packages"), "/apis/packages");
        assert_eq!(normalize_path("/v1.9.0/packages"), "/v1.9.0/packages");
        assert_eq!(normalize_path("/v/packages"), "/v/packages");
        assert_eq!(normalize_path("/packages/v1"), "/packages/v1");
    }

    #[test]
    fn head_routes_like_get() {
        assert_eq!(normalize_method("HEAD"), Method::Get);
        assert_eq!(normalize_method("get"), Method::Get);
        assert_eq!(normalize_method("POST"), Method::Post);
        assert_eq!(normalize_method("DELETE"), Method::Other);
        assert_eq!(resolve("HEAD", "/information"), Route::Information);
    }

    #[test]
    fn route_table() {
        assert_eq!(resolve("GET", "/"), Route::Information);
        assert_eq!(resolve("GET", "/api/v1.9/information"), Route::Information);
        assert_eq!(resolve("POST", "/manifestSearch"), Route::ManifestSearch);
        assert_eq!(resolve("GET", "/manifestSearch"), Route::ManifestSearch);
        assert_eq!(resolve("GET", "/packageManifests"), Route::PackageManifests);
        assert_eq!(
            resolve("GET", "/packageManifests/D4RKO.MPV"),
            Route::PackageManifest {
                id: "D4RKO.MPV".into()
            }
        );
        assert_eq!(resolve("GET", "/packages"), Route::Packages);
        assert_eq!(
            resolve("GET", "/packages/d4rko.mpv/versions/1.2.3/locales"),
            Route::Locales {
                id: "d4rko.mpv".into(),
                version: "1.2.3".into()
            }
        );
        assert_eq!(
            resolve("GET", "/v1.1/packages/d4rko.mpv/versions/1.2.3/installers/"),
            Route::Installers {
                id: "d4rko.mpv".into(),
                version: "1.2.3".into()
            }
        );
    }

    #[test]
    fn unmatched_requests_are_not_found() {
        assert_eq!(resolve("POST", "/packages"), Route::NotFound);
        assert_eq!(resolve("POST", "/"), Route::NotFound);
        assert_eq!(resolve("DELETE", "/information"), Route::NotFound);
        assert_eq!(resolve("GET", "/packages/a/b"), Route::NotFound);
        assert_eq!(
            resolve("GET", "/packages/a/versions/1/installers/x"),
            Route::NotFound
        );
        assert_eq!(resolve("GET", "/PackageManifests"), Route::NotFound);
    }

    #[test]
    fn package_id_is_exposed_for_id_routes() {
        assert_eq!(resolve("GET", "/packages/x").package_id(), Some("x"));
        assert_eq!(resolve("GET", "/packages").package_id(), None);
    }
}
