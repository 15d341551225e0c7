use crate::config::CrawlerConfig;
use crate::url::CrawlTarget;
use crate::UrlError;
use url::Url;

/// The host and path prefix a crawl stays inside
///
/// Hyperlinks are in scope when they are root-relative (`/...`, joined onto the
/// base domain) or absolute and already under the base URL. Everything else
/// (other hosts, `mailto:`, `javascript:`, query-only and fragment-only hrefs)
/// is out of scope, which is a normal negative answer rather than an error.
#[derive(Debug, Clone)]
pub struct CrawlScope {
    /// Origin without trailing slash, e.g. `https://da.live`
    base_domain: String,
    /// Prefix without trailing slash, e.g. `https://da.live/docs`
    base_url: String,
    host: String,
    scheme: String,
}

impl CrawlScope {
    /// Creates a scope from a base domain and a base URL under it
    ///
    /// # Examples
    ///
    /// ```
    /// use docquarry::url::CrawlScope;
    ///
    /// let scope = CrawlScope::new("https://da.live", "https://da.live/docs").unwrap();
    /// let target = scope.resolve_link("/docs/editor").unwrap();
    /// assert_eq!(target.as_str(), "https://da.live/docs/editor");
    /// assert!(scope.resolve_link("https://github.com/adobe").is_none());
    /// ```
    pub fn new(base_domain: &str, base_url: &str) -> Result<Self, UrlError> {
        let domain = Url::parse(base_domain).map_err(|e| UrlError::Parse(e.to_string()))?;
        let host = domain.host_str().ok_or(UrlError::MissingDomain)?.to_string();

        Ok(Self {
            base_domain: base_domain.trim().trim_end_matches('/').to_string(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            host,
            scheme: domain.scheme().to_string(),
        })
    }

    /// Creates the scope described by the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, UrlError> {
        Self::new(&config.base_domain, &config.base_url)
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turns an anchor href into a crawl target, or `None` if it is out of scope
    pub fn resolve_link(&self, href: &str) -> Option<CrawlTarget> {
        let href = href.trim();

        // Protocol-relative hrefs point at arbitrary hosts
        let candidate = if href.starts_with("//") {
            return None;
        } else if href.starts_with('/') {
            format!("{}{}", self.base_domain, href)
        } else if href.starts_with(&self.base_url) {
            href.to_string()
        } else {
            return None;
        };

        match CrawlTarget::parse(&candidate) {
            Ok(target) if self.contains(&target) => Some(target),
            Ok(target) => {
                tracing::trace!("Skipping {}: host outside {}", target, self.host);
                None
            }
            Err(e) => {
                tracing::debug!("Skipping unparseable link {}: {}", href, e);
                None
            }
        }
    }

    /// Rewrites an image source to absolute form
    ///
    /// Root-relative sources are appended to the base URL, protocol-relative
    /// sources get the base scheme, and everything else passes through unchanged.
    pub fn resolve_image(&self, src: &str) -> String {
        let src = src.trim();
        if src.starts_with("//") {
            format!("{}:{}", self.scheme, src)
        } else if src.starts_with('/') {
            format!("{}{}", self.base_url, src)
        } else {
            src.to_string()
        }
    }

    /// Returns true if the target lives on the scope's host
    pub fn contains(&self, target: &CrawlTarget) -> bool {
        target.host() == self.host
    }
}
