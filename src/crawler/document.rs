use serde::{Deserialize, Serialize};

/// The structured extraction result for one successfully fetched page
///
/// Field names on the wire (`url`, `title`, `content`, `images`,
/// `youtube_links`) are the hand-off format read by the embedding stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedDocument {
    /// Normalized URL the page was fetched from
    pub url: String,

    /// Text of the first heading, or the title placeholder
    pub title: String,

    /// Visible text of the main-content region, or the content placeholder
    pub content: String,

    /// Image sources in document order, root-relative ones made absolute
    #[serde(default)]
    pub images: Vec<String>,

    /// Video references: embedded frames first, then anchors
    #[serde(rename = "youtube_links", default)]
    pub videos: Vec<String>,
}
