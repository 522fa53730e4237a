//! Latest-release discovery from upstream directory listings.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const PYTHON_INDEX: &str = "https://www.python.org/ftp/python/";
pub const GCC_INDEX: &str = "https://ftp.gnu.org/gnu/gcc/";

/// `href="X.Y.Z/"` anchors in the python.org FTP listing.
static PYTHON_RELEASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(\d+\.\d+\.\d+)/""#).unwrap());

/// `gcc-X.Y.Z/` directories in the GNU mirror listing.
static GCC_RELEASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"gcc-(\d+\.\d+\.\d+)/").unwrap());

#[derive(Error, Debug)]
pub enum VersionError {
    #[error("failed to fetch {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },
    #[error("no release versions found at {0}")]
    NoReleases(String),
}

/// Newest CPython release advertised upstream.
pub async fn latest_python_release() -> Result<String, VersionError> {
    let listing = fetch_listing(PYTHON_INDEX).await?;
    newest_release(&PYTHON_RELEASE_RE, &listing)
        .ok_or_else(|| VersionError::NoReleases(PYTHON_INDEX.to_string()))
}

/// Newest GCC release advertised upstream.
pub async fn latest_gcc_release() -> Result<String, VersionError> {
    let listing = fetch_listing(GCC_INDEX).await?;
    newest_release(&GCC_RELEASE_RE, &listing)
        .ok_or_else(|| VersionError::NoReleases(GCC_INDEX.to_string()))
}

async fn fetch_listing(url: &str) -> Result<String, VersionError> {
    let fetch_err = |source| VersionError::Fetch {
        url: url.to_string(),
        source,
    };

    let response = reqwest::get(url).await.map_err(fetch_err)?;
    let response = response.error_for_status().map_err(fetch_err)?;
    response.text().await.map_err(fetch_err)
}

/// Numerically-largest `X.Y.Z` captured by the pattern.
fn newest_release(pattern: &Regex, listing: &str) -> Option<String> {
    let mut best: Option<(u32, u32, u32)> = None;

    for caps in pattern.captures_iter(listing) {
        let Some(version) = parse_triple(&caps[1]) else {
            continue;
        };
        if best.is_none_or(|b| version > b) {
            best = Some(version);
        }
    }

    best.map(|(major, minor, patch)| format!("{major}.{minor}.{patch}"))
}

fn parse_triple(s: &str) -> Option<(u32, u32, u32)> {
    let mut parts = s.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next()?.parse().ok()?;
    Some((major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_listing_sorts_numerically() {
        let listing = r#"
<a href="3.9.19/">3.9.19/</a>
<a href="3.13.1/">3.13.1/</a>
<a href="3.10.14/">3.10.14/</a>
<a href="2.7.18/">2.7.18/</a>
"#;
        assert_eq!(
            newest_release(&PYTHON_RELEASE_RE, listing).as_deref(),
            Some("3.13.1")
        );
    }

    #[test]
    fn test_gcc_listing() {
        let listing = r#"
<a href="gcc-13.3.0/">gcc-13.3.0/</a>
<a href="gcc-14.2.0/">gcc-14.2.0/</a>
<a href="gcc-9.5.0/">gcc-9.5.0/</a>
"#;
        assert_eq!(
            newest_release(&GCC_RELEASE_RE, listing).as_deref(),
            Some("14.2.0")
        );
    }

    #[test]
    fn test_listing_without_versions() {
        assert!(newest_release(&PYTHON_RELEASE_RE, "<html></html>").is_none());
    }

    #[test]
    fn test_parse_triple() {
        assert_eq!(parse_triple("4.1.6"), Some((4, 1, 6)));
        assert_eq!(parse_triple("4.1"), None);
        assert_eq!(parse_triple("a.b.c"), None);
    }
}
