use chrono::{DateTime, NaiveDateTime};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

const DESCRIPTION_CHARS: usize = 120;

/// Medium serves a 1x1 tracking image as the thumbnail for some posts
const TRACKING_PIXEL_MARKER: &str = "stat?event=post.clientViewed";

/// One post summary as returned by the RSS-to-JSON bridge
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub title: String,
    #[serde(default)]
    pub pub_date: String,
    pub link: String,
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

fn tag_pattern() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

fn img_pattern() -> &'static Regex {
    static IMG: OnceLock<Regex> = OnceLock::new();
    IMG.get_or_init(|| Regex::new(r#"<img[^>]+src="([^">]+)""#).expect("img pattern is valid"))
}

impl BlogPost {
    /// Publish date as "Jan 5, 2025". Falls back to the raw string.
    pub fn display_date(&self) -> String {
        let raw = self.pub_date.trim();
        let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .or_else(|| DateTime::parse_from_rfc2822(raw).ok().map(|d| d.naive_utc()))
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.naive_utc()));
        match parsed {
            Some(date) => date.format("%b %-d, %Y").to_string(),
            None => raw.to_string(),
        }
    }

    /// Plain-text teaser: tags stripped, first 120 characters, then "...".
    /// Uses the content when the description is empty.
    pub fn clean_description(&self) -> String {
        let source = if self.description.is_empty() {
            &self.content
        } else {
            &self.description
        };
        let text = tag_pattern().replace_all(source, "");
        let teaser: String = text.chars().take(DESCRIPTION_CHARS).collect();
        format!("{}...", teaser)
    }

    /// Thumbnail to show, or the first image in the content when the feed
    /// only has a tracking pixel (or nothing).
    pub fn display_thumbnail(&self) -> Option<String> {
        if !self.thumbnail.is_empty() && !self.thumbnail.contains(TRACKING_PIXEL_MARKER) {
            return Some(self.thumbnail.clone());
        }
        img_pattern()
            .captures(&self.content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn top_categories(&self) -> &[String] {
        let end = self.categories.len().min(3);
        &self.categories[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> BlogPost {
        BlogPost {
            title: "Shipping a side project".to_string(),
            pub_date: "2025-01-05 10:20:30".to_string(),
            link: "https://medium.com/@someone/shipping".to_string(),
            guid: String::new(),
            author: "someone".to_string(),
            thumbnail: String::new(),
            description: String::new(),
            content: String::new(),
            categories: vec![],
        }
    }

    #[test]
    fn test_display_date_from_bridge_format() {
        assert_eq!(post().display_date(), "Jan 5, 2025");
    }

    #[test]
    fn test_display_date_from_rfc2822() {
        let mut p = post();
        p.pub_date = "Tue, 14 Oct 2025 08:00:00 GMT".to_string();
        assert_eq!(p.display_date(), "Oct 14, 2025");
    }

    #[test]
    fn test_display_date_unparseable_is_raw() {
        let mut p = post();
        p.pub_date = "yesterday".to_string();
        assert_eq!(p.display_date(), "yesterday");
    }

    #[test]
    fn test_clean_description_strips_tags() {
        let mut p = post();
        p.description = "<p>Hello <b>world</b></p>".to_string();
        assert_eq!(p.clean_description(), "Hello world...");
    }

    #[test]
    fn test_clean_description_uses_content_and_truncates() {
        let mut p = post();
        p.content = format!("<h3>Intro</h3>{}", "a".repeat(200));
        let cleaned = p.clean_description();
        assert!(cleaned.starts_with("Introaaa"));
        assert_eq!(cleaned.chars().count(), 123);
    }

    #[test]
    fn test_thumbnail_skips_tracking_pixel() {
        let mut p = post();
        p.thumbnail = "https://medium.com/_/stat?event=post.clientViewed&x=1".to_string();
        p.content = r#"<figure><img alt="" src="https://cdn-images.medium.com/cover.png" /></figure>"#.to_string();
        assert_eq!(
            p.display_thumbnail().as_deref(),
            Some("https://cdn-images.medium.com/cover.png")
        );
    }

    #[test]
    fn test_thumbnail_prefers_real_thumbnail() {
        let mut p = post();
        p.thumbnail = "https://cdn-images.medium.com/thumb.png".to_string();
        assert_eq!(
            p.display_thumbnail().as_deref(),
            Some("https://cdn-images.medium.com/thumb.png")
        );
    }

    #[test]
    fn test_thumbnail_missing() {
        assert_eq!(post().display_thumbnail(), None);
    }

    #[test]
    fn test_top_categories() {
        let mut p = post();
        p.categories = ["rust", "cli", "tui", "web"].iter().map(|s| s.to_string()).collect();
        assert_eq!(p.top_categories(), &p.categories[..3]);
        assert!(post().top_categories().is_empty());
    }
}
