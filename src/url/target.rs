use crate::UrlError;
use std::fmt;
use url::Url;

/// A normalized, absolute URL the crawler may visit
///
/// Two targets are the same page exactly when their normalized strings are equal.
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an http or https scheme and a host
/// 3. Lowercase the host and resolve `.`/`..` path segments (done by the parser)
/// 4. Remove the fragment (everything after #)
///
/// # Examples
///
/// ```
/// use docquarry::url::CrawlTarget;
///
/// let target = CrawlTarget::parse("https://DA.live/docs/a/../b#intro").unwrap();
/// assert_eq!(target.as_str(), "https://da.live/docs/b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrawlTarget(Url);

impl CrawlTarget {
    /// Parses and normalizes a URL string
    pub fn parse(url_str: &str) -> Result<Self, UrlError> {
        let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(url.scheme().to_string()));
        }

        if url.host_str().is_none() {
            return Err(UrlError::MissingDomain);
        }

        url.set_fragment(None);

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Lowercase host of the target
    pub fn host(&self) -> &str {
        // Construction guarantees a host
        self.0.host_str().unwrap_or_default()
    }
}

impl fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for CrawlTarget {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
