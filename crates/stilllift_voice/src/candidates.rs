//! Candidate asset names for a narration, in strict priority order.
//!
//! 1. Structured `Mood_<Mood>_Context_<Context>_Audio_<n>` files
//! 2. The homepage ambient file
//! 3. Slugs derived from the title and message text
//!
//! There is no existence check; the narrator learns whether a candidate
//! exists only by trying to play it.

use crate::request::NarrationRequest;
use regex::Regex;
use std::sync::LazyLock;
use stilllift_core::AudioConfig;

static NON_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new("[^a-z0-9]+").unwrap());

/// Where assets live and how they are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    pub primary_dir: String,
    pub secondary_dir: String,
    pub extensions: Vec<String>,
    pub homepage_asset: String,
    pub slug_max_len: usize,
}

impl Default for AssetLayout {
    fn default() -> Self {
        Self::from(&AudioConfig::default())
    }
}

impl From<&AudioConfig> for AssetLayout {
    fn from(config: &AudioConfig) -> Self {
        Self {
            primary_dir: config.primary_dir.trim_end_matches('/').to_string(),
            secondary_dir: config.secondary_dir.trim_end_matches('/').to_string(),
            extensions: config.extensions.clone(),
            homepage_asset: config.homepage_asset.clone(),
            slug_max_len: config.slug_max_len,
        }
    }
}

/// URL-safe slug: lowercase, non-alphanumeric runs collapsed to one hyphen,
/// no hyphen at either end, at most `max_len` characters.
pub fn slugify(input: &str, max_len: usize) -> String {
    let lowered = input.to_lowercase();
    let collapsed = NON_SLUG.replace_all(&lowered, "-");
    let trimmed = collapsed.trim_matches('-');
    let capped: String = trimmed.chars().take(max_len).collect();
    capped.trim_end_matches('-').to_string()
}

/// The slug a pre-rendered file for this text should be named after.
pub fn suggested_slug(title: Option<&str>, message: &str, max_len: usize) -> String {
    match title.filter(|t| !t.trim().is_empty()) {
        Some(title) => slugify(&format!("{} {}", title, message), max_len),
        None => slugify(message, max_len),
    }
}

pub fn candidate_sources(request: &NarrationRequest, layout: &AssetLayout) -> Vec<String> {
    let mut candidates = Vec::new();

    let structured = match (request.mood, request.context) {
        (Some(mood), Some(context)) => Some((mood, context)),
        _ => None,
    };

    if let Some((mood, context)) = structured {
        let primary = request.audio_index.unwrap_or(1).max(1);
        let mut indices = vec![primary];
        if !request.prefer_exact_index && primary != 1 {
            indices.push(1);
        }

        for index in indices {
            let stem = format!(
                "{}/Mood_{}_Context_{}_Audio_{}",
                layout.primary_dir,
                mood.capitalized(),
                context.audio_name(),
                index
            );
            candidates.extend(layout.extensions.iter().map(|ext| format!("{}.{}", stem, ext)));
        }
    }

    if request.is_homepage && structured.is_none() {
        candidates.push(layout.homepage_asset.clone());
    }

    let mut slugs = Vec::new();
    if let Some(title) = request.spoken_title() {
        slugs.push(slugify(&format!("{} {}", title, request.message), layout.slug_max_len));
    }
    slugs.push(slugify(&request.message, layout.slug_max_len));

    for slug in slugs.iter().filter(|s| !s.is_empty()) {
        for dir in [&layout.primary_dir, &layout.secondary_dir] {
            candidates.extend(
                layout
                    .extensions
                    .iter()
                    .map(|ext| format!("{}/{}.{}", dir, slug, ext)),
            );
        }
    }

    candidates
}
