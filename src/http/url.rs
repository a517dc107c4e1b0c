//! Loose URL splitting.
//!
//! The input is normalized with a trailing `/`, then split at the first `/`
//! following the `//` scheme separator. The scheme is never checked and
//! nothing is decoded; case is kept as given.

use thiserror::Error;

/// Why a URL could not be split.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("URL is empty")]
    Empty,
    #[error("no `//` scheme separator")]
    MissingSchemeSeparator,
    #[error("no `/` after the host")]
    MissingPath,
}

/// Host and path the proxy will request from the origin.
///
/// `path` always starts with `/`; `host` never contains `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginRequest {
    pub host: String,
    pub path: String,
}

impl OriginRequest {
    /// Name and port to dial.
    ///
    /// A host written as `name:port` or `[v6]:port` carries its own port;
    /// anything else uses `default_port`.
    pub fn origin_address(&self, default_port: u16) -> (&str, u16) {
        if let Some((name, port)) = self.host.rsplit_once(':') {
            if let Ok(port) = port.parse::<u16>() {
                let bracketed = name.starts_with('[') && name.ends_with(']');
                if bracketed {
                    return (&name[1..name.len() - 1], port);
                }
                if !name.contains(':') && !name.is_empty() {
                    return (name, port);
                }
            }
        }

        let host = self.host.as_str();
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        (host, default_port)
    }
}

/// Split `url` into host and path.
pub fn parse_url(url: &str) -> Result<OriginRequest, UrlError> {
    if url.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut normalized = url.to_owned();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }

    let start = normalized
        .find("//")
        .ok_or(UrlError::MissingSchemeSeparator)?
        + 2;
    let to_host = normalized[start..]
        .find('/')
        .map(|offset| start + offset)
        .ok_or(UrlError::MissingPath)?;

    Ok(OriginRequest {
        host: normalized[start..to_host].to_owned(),
        path: normalized[to_host..].to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_host_and_root_path() {
        let parsed = parse_url("http://example.com/").unwrap();
        assert_eq!(parsed.host, "example.com");
        assert_eq!(parsed.path, "/");
    }

    #[test]
    fn appends_missing_trailing_slash() {
        let parsed = parse_url("http://eu.httpbin.org").unwrap();
        assert_eq!(parsed.host, "eu.httpbin.org");
        assert_eq!(parsed.path, "/");
    }

    #[test]
    fn nested_path_keeps_everything_after_host() {
        let parsed = parse_url("http://info.cern.ch/hypertext/WWW/TheProject.html").unwrap();
        assert_eq!(parsed.host, "info.cern.ch");
        // normalization adds a slash to paths not ending in one
        assert_eq!(parsed.path, "/hypertext/WWW/TheProject.html/");
    }

    #[test]
    fn reconstructs_normalized_url() {
        for url in [
            "http://example.com/",
            "https://www-db.deis.unibo.it/",
            "ftp://Host.Example/a/b/",
            "http://127.0.0.1:8080/index/",
        ] {
            let parsed = parse_url(url).unwrap();
            assert!(parsed.path.starts_with('/'));
            assert!(!parsed.host.contains('/'));
            let scheme = &url[..url.find("//").unwrap() + 2];
            assert_eq!(format!("{scheme}{}{}", parsed.host, parsed.path), url);
        }
    }

    #[test]
    fn preserves_case_and_query() {
        let parsed = parse_url("HTTP://Example.COM/Search?q=Rust/").unwrap();
        assert_eq!(parsed.host, "Example.COM");
        assert_eq!(parsed.path, "/Search?q=Rust/");
    }

    #[test]
    fn rejects_missing_scheme_separator() {
        assert_eq!(parse_url("not a url"), Err(UrlError::MissingSchemeSeparator));
        assert_eq!(parse_url("example.com/path"), Err(UrlError::MissingSchemeSeparator));
    }

    #[test]
    fn rejects_missing_path_separator() {
        assert_eq!(parse_url("http://"), Err(UrlError::MissingPath));
        assert_eq!(parse_url("a//"), Err(UrlError::MissingPath));
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse_url(""), Err(UrlError::Empty));
    }

    #[test]
    fn origin_address_defaults_port() {
        let parsed = parse_url("http://example.com/").unwrap();
        assert_eq!(parsed.origin_address(80), ("example.com", 80));
    }

    #[test]
    fn origin_address_uses_explicit_port() {
        let parsed = parse_url("http://127.0.0.1:8080/").unwrap();
        assert_eq!(parsed.origin_address(80), ("127.0.0.1", 8080));

        let parsed = parse_url("http://[::1]:9000/x").unwrap();
        assert_eq!(parsed.origin_address(80), ("::1", 9000));
    }

    #[test]
    fn origin_address_ignores_non_numeric_suffix() {
        let parsed = parse_url("http://[::1]/").unwrap();
        assert_eq!(parsed.origin_address(80), ("::1", 80));

        let parsed = parse_url("http://host:http/").unwrap();
        assert_eq!(parsed.origin_address(80), ("host:http", 80));
    }
}
