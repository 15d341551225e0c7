//! HTML parser for extracting page content and media
//!
//! This module turns a fetched page into a [`ScrapedDocument`]:
//! - Title from the first heading
//! - Body text from the main-content region
//! - Image sources (root-relative ones made absolute)
//! - YouTube references from embedded frames and anchors
//!
//! Missing sections degrade to placeholders; parsing never fails.

use crate::config::CrawlerConfig;
use crate::crawler::ScrapedDocument;
use crate::url::{CrawlScope, CrawlTarget};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// Substrings that mark a URL as a video reference
const VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

/// Extracts documents from HTML using selectors compiled once per crawl
#[derive(Debug, Clone)]
pub struct PageParser {
    title: Selector,
    content: Selector,
    images: Selector,
    frames: Selector,
    anchors: Selector,
    title_placeholder: String,
    content_placeholder: String,
}

impl PageParser {
    /// Builds a parser from the crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(PageParser)` - Selectors compiled
    /// * `Err(ConfigError)` - A configured selector is not valid CSS
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            title: compile(&config.title_selector)?,
            content: compile(&config.content_selector)?,
            images: compile("img[src]")?,
            frames: compile("iframe[src]")?,
            anchors: compile("a[href]")?,
            title_placeholder: config.title_placeholder.clone(),
            content_placeholder: config.content_placeholder.clone(),
        })
    }

    /// Parses a page that was fetched from `url`
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use docquarry::crawler::PageParser;
    /// # use docquarry::url::{CrawlScope, CrawlTarget};
    /// # use scraper::Html;
    /// # fn example(parser: &PageParser, scope: &CrawlScope) {
    /// let html = Html::parse_document("<main><h1>Overview</h1><img src=\"/img/a.png\"></main>");
    /// let url = CrawlTarget::parse("https://da.live/docs").unwrap();
    /// let doc = parser.parse(&html, &url, scope);
    /// assert_eq!(doc.title, "Overview");
    /// assert_eq!(doc.images, vec!["https://da.live/docs/img/a.png"]);
    /// # }
    /// ```
    pub fn parse(&self, document: &Html, url: &CrawlTarget, scope: &CrawlScope) -> ScrapedDocument {
        ScrapedDocument {
            url: url.to_string(),
            title: self.extract_title(document),
            content: self.extract_content(document),
            images: self.extract_images(document, scope),
            videos: self.extract_videos(document),
        }
    }

    fn extract_title(&self, document: &Html) -> String {
        document
            .select(&self.title)
            .next()
            .map(element_text)
            .unwrap_or_else(|| self.title_placeholder.clone())
    }

    fn extract_content(&self, document: &Html) -> String {
        document
            .select(&self.content)
            .next()
            .map(element_text)
            .unwrap_or_else(|| self.content_placeholder.clone())
    }

    fn extract_images(&self, document: &Html, scope: &CrawlScope) -> Vec<String> {
        document
            .select(&self.images)
            .filter_map(|img| img.value().attr("src"))
            .map(|src| scope.resolve_image(src))
            .collect()
    }

    /// Embedded frames first, then anchors; the same video may appear in both
    fn extract_videos(&self, document: &Html) -> Vec<String> {
        let frames = document
            .select(&self.frames)
            .filter_map(|frame| frame.value().attr("src"));
        let anchors = document
            .select(&self.anchors)
            .filter_map(|a| a.value().attr("href"));

        frames
            .chain(anchors)
            .filter(|link| is_video_link(link))
            .map(str::to_string)
            .collect()
    }
}

/// Returns true if the URL points at YouTube
pub fn is_video_link(link: &str) -> bool {
    VIDEO_HOSTS.iter().any(|host| link.contains(host))
}

/// Concatenated descendant text, trimmed at both ends
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> PageParser {
        let config = CrawlerConfig {
            base_domain: "https://da.live".to_string(),
            base_url: "https://da.live/docs".to_string(),
            seed_url: None,
            politeness_delay_ms: 0,
            max_pages: None,
            max_depth: None,
            title_placeholder: "No Title".to_string(),
            content_placeholder: "No Content".to_string(),
            title_selector: "h1".to_string(),
            content_selector: "main".to_string(),
        };
        PageParser::from_config(&config).unwrap()
    }

    fn parse(html: &str) -> ScrapedDocument {
        let scope = CrawlScope::new("https://da.live", "https://da.live/docs").unwrap();
        let url = CrawlTarget::parse("https://da.live/docs").unwrap();
        parser().parse(&Html::parse_document(html), &url, &scope)
    }

    #[test]
    fn test_extract_title_and_content() {
        let doc = parse(
            r#"<html><body><h1>  Overview </h1><main>
                <p>Welcome to the docs.</p>
            </main></body></html>"#,
        );
        assert_eq!(doc.url, "https://da.live/docs");
        assert_eq!(doc.title, "Overview");
        assert_eq!(doc.content, "Welcome to the docs.");
    }

    #[test]
    fn test_first_heading_wins() {
        let doc = parse("<h1>First</h1><h1>Second</h1>");
        assert_eq!(doc.title, "First");
    }

    #[test]
    fn test_nested_text_concatenated() {
        let doc = parse("<main><h2>Setup</h2><p>Run <code>npm i</code></p></main>");
        assert_eq!(doc.content, "SetupRun npm i");
    }

    #[test]
    fn test_missing_heading_uses_placeholder() {
        let doc = parse("<main>Body only</main>");
        assert_eq!(doc.title, "No Title");
        assert_eq!(doc.content, "Body only");
    }

    #[test]
    fn test_missing_main_uses_placeholder() {
        let doc = parse("<h1>Title only</h1><div>not main</div>");
        assert_eq!(doc.content, "No Content");
    }

    #[test]
    fn test_empty_page_never_fails() {
        let doc = parse("");
        assert_eq!(doc.title, "No Title");
        assert_eq!(doc.content, "No Content");
        assert!(doc.images.is_empty());
        assert!(doc.videos.is_empty());
    }

    #[test]
    fn test_images_made_absolute_in_order_keeping_empty_sources() {
        let doc = parse(
            r#"<img src="/img/x.png"><img src="https://cdn.example.com/y.png"><img alt="no src"><img src="">"#,
        );
        assert_eq!(
            doc.images,
            vec![
                "https://da.live/docs/img/x.png".to_string(),
                "https://cdn.example.com/y.png".to_string(),
                String::new(),
            ]
        );
    }

    #[test]
    fn test_videos_frames_before_anchors_without_dedup() {
        let doc = parse(
            r#"
            <a href="https://www.youtube.com/watch?v=abc">watch</a>
            <iframe src="https://www.youtube.com/embed/abc"></iframe>
            <a href="https://youtu.be/xyz">short</a>
            <iframe src="https://player.vimeo.com/video/1"></iframe>
            <a href="https://www.youtube.com/embed/abc">same as frame</a>
            <a href="/docs/other">internal</a>
            "#,
        );
        assert_eq!(
            doc.videos,
            vec![
                "https://www.youtube.com/embed/abc".to_string(),
                "https://www.youtube.com/watch?v=abc".to_string(),
                "https://youtu.be/xyz".to_string(),
                "https://www.youtube.com/embed/abc".to_string(),
            ]
        );
    }

    #[test]
    fn test_custom_selectors() {
        let config = CrawlerConfig {
            base_domain: "https://da.live".to_string(),
            base_url: "https://da.live/docs".to_string(),
            seed_url: None,
            politeness_delay_ms: 0,
            max_pages: None,
            max_depth: None,
            title_placeholder: "Untitled".to_string(),
            content_placeholder: "Empty".to_string(),
            title_selector: "h2.title".to_string(),
            content_selector: "article".to_string(),
        };
        let parser = PageParser::from_config(&config).unwrap();
        let scope = CrawlScope::new("https://da.live", "https://da.live/docs").unwrap();
        let url = CrawlTarget::parse("https://da.live/docs/x").unwrap();

        let doc = parser.parse(
            &Html::parse_document("<h1>Ignored</h1><h2 class=\"title\">Real</h2><article>Text</article>"),
            &url,
            &scope,
        );
        assert_eq!(doc.title, "Real");
        assert_eq!(doc.content, "Text");

        let empty = parser.parse(&Html::parse_document("<p>x</p>"), &url, &scope);
        assert_eq!(empty.title, "Untitled");
        assert_eq!(empty.content, "Empty");
    }

    #[test]
    fn test_is_video_link() {
        assert!(is_video_link("https://youtube.com/watch?v=1"));
        assert!(is_video_link("https://youtu.be/1"));
        assert!(!is_video_link("https://vimeo.com/1"));
    }
}
