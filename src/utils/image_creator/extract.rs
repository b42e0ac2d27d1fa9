//! Result link extraction from the completed results page.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::error::{ImageCreatorError, ImageCreatorResult};

/// Images the service substitutes for results it moderated after the fact.
pub const PLACEHOLDER_IMAGES: [&str; 2] = [
    "https://r.bing.com/rp/in-2zU3AJUdkgFe7ZKv19yPBHVs.png",
    "https://r.bing.com/rp/TX9QuO3WzcCJz1uaaSwQAz39Kb0.jpg",
];

static SRC_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"src="([^"]+)""#).unwrap());

/// Pulls the full-resolution image links out of a results page.
///
/// Thumbnail size caps (`?w=...`) are stripped and duplicates removed,
/// keeping the first occurrence of each link.
///
/// # Errors
///
/// * [`ImageCreatorError::UnsafeContent`] if any link is a moderation placeholder.
/// * [`ImageCreatorError::NoImages`] if the page holds no links at all.
pub fn extract_image_urls(html: &str) -> ImageCreatorResult<Vec<String>> {
    let mut seen = HashSet::new();
    let urls: Vec<String> = SRC_REGEX
        .captures_iter(html)
        .filter_map(|captures| captures.get(1))
        .map(|link| strip_size_limit(link.as_str()).to_string())
        .filter(|link| seen.insert(link.clone()))
        .collect();

    if let Some(url) = urls
        .iter()
        .find(|url| PLACEHOLDER_IMAGES.contains(&url.as_str()))
    {
        return Err(ImageCreatorError::UnsafeContent { url: url.clone() });
    }

    if urls.is_empty() {
        return Err(ImageCreatorError::NoImages);
    }

    Ok(urls)
}

fn strip_size_limit(link: &str) -> &str {
    link.split("?w=").next().unwrap_or(link)
}
