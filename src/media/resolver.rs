use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{EditorError, EditorResult},
    scene::model::{MediaKind, Scene},
};

pub const DEFAULT_PER_PAGE: u32 = 20;

/// Which media catalog a search targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    #[default]
    Images,
    Videos,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Images => "images",
            SearchKind::Videos => "videos",
        }
    }

    /// Background mode a pick of this kind switches the scene to.
    pub fn media_kind(self) -> MediaKind {
        match self {
            SearchKind::Images => MediaKind::Image,
            SearchKind::Videos => MediaKind::Video,
        }
    }

    /// Query parameters the search proxy forwards for this kind. Anything else is dropped.
    pub fn allowed_params(self) -> &'static [&'static str] {
        match self {
            SearchKind::Images => &[
                "q",
                "lang",
                "id",
                "image_type",
                "orientation",
                "category",
                "min_width",
                "min_height",
                "colors",
                "editors_choice",
                "safesearch",
                "order",
                "page",
                "per_page",
            ],
            SearchKind::Videos => &[
                "q",
                "lang",
                "id",
                "video_type",
                "category",
                "min_width",
                "min_height",
                "editors_choice",
                "safesearch",
                "order",
                "page",
                "per_page",
            ],
        }
    }
}

/// A free-text media search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaQuery {
    pub kind: SearchKind,
    pub text: String,
    pub safesearch: bool,
    pub per_page: u32,
    pub page: Option<u32>,
    /// Additional filters such as `orientation` or `order`.
    pub extra: Vec<(String, String)>,
}

impl MediaQuery {
    pub fn new(kind: SearchKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            safesearch: true,
            per_page: DEFAULT_PER_PAGE,
            page: None,
            extra: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Key/value pairs to send, restricted to [`SearchKind::allowed_params`].
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let allowed = self.kind.allowed_params();
        let mut pairs = vec![
            ("q".to_owned(), self.text.clone()),
            ("safesearch".to_owned(), self.safesearch.to_string()),
            ("per_page".to_owned(), self.per_page.to_string()),
        ];
        if let Some(page) = self.page {
            pairs.push(("page".to_owned(), page.to_string()));
        }
        for (key, value) in &self.extra {
            if !allowed.contains(&key.as_str()) {
                tracing::debug!(
                    key = %key,
                    kind = self.kind.as_str(),
                    "dropping unsupported search parameter"
                );
                continue;
            }
            match pairs.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1 = value.clone(),
                None => pairs.push((key.clone(), value.clone())),
            }
        }
        pairs
    }
}

/// One search result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaHit {
    pub id: u64,
    pub tags: String,
    pub kind: SearchKind,
    /// Thumbnail shown in the result grid.
    pub preview_url: Option<String>,
    /// Full renditions, best first.
    pub urls: Vec<String>,
}

impl MediaHit {
    /// The URL a pick assigns to the scene background.
    pub fn pick_url(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }
}

/// Source of background media candidates.
pub trait MediaResolver {
    fn search(&self, query: &MediaQuery) -> EditorResult<Vec<MediaHit>>;
}

/// Result of a search as the editor shows it: hits, or an inline error with no hits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub hits: Vec<MediaHit>,
    pub error: Option<String>,
}

pub fn search_or_empty(resolver: &dyn MediaResolver, query: &MediaQuery) -> SearchOutcome {
    match resolver.search(query) {
        Ok(hits) => SearchOutcome { hits, error: None },
        Err(err) => {
            tracing::warn!(%err, kind = query.kind.as_str(), "media search failed");
            SearchOutcome {
                hits: Vec::new(),
                error: Some(err.to_string()),
            }
        }
    }
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    hits: serde_json::Value,
}

#[derive(Deserialize)]
struct RawImageHit {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    tags: String,
    #[serde(rename = "previewURL")]
    preview_url: Option<String>,
    #[serde(rename = "webformatURL")]
    webformat_url: Option<String>,
    #[serde(rename = "largeImageURL")]
    large_image_url: Option<String>,
}

#[derive(Deserialize)]
struct RawRendition {
    url: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawVideoSet {
    medium: Option<RawRendition>,
    small: Option<RawRendition>,
    tiny: Option<RawRendition>,
}

#[derive(Deserialize)]
struct RawVideoHit {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    videos: RawVideoSet,
}

fn non_empty(url: Option<String>) -> Option<String> {
    url.filter(|u| !u.trim().is_empty())
}

/// Parse a Pixabay-shaped JSON body into hits.
///
/// A body without a `hits` array yields no hits. Individual hits that fail to parse or carry
/// no usable URL are skipped.
pub fn parse_pixabay_response(kind: SearchKind, body: &str) -> EditorResult<Vec<MediaHit>> {
    let raw: RawResponse = serde_json::from_str(body)
        .map_err(|e| EditorError::resolve(format!("malformed search response: {e}")))?;
    let serde_json::Value::Array(items) = raw.hits else {
        return Ok(Vec::new());
    };

    let mut hits = Vec::with_capacity(items.len());
    for item in items {
        let hit = match kind {
            SearchKind::Images => serde_json::from_value::<RawImageHit>(item).map(|h| {
                let preview = non_empty(h.preview_url);
                let urls = [
                    non_empty(h.large_image_url),
                    non_empty(h.webformat_url),
                    preview.clone(),
                ]
                .into_iter()
                .flatten()
                .collect();
                MediaHit {
                    id: h.id,
                    tags: h.tags,
                    kind,
                    preview_url: preview,
                    urls,
                }
            }),
            SearchKind::Videos => serde_json::from_value::<RawVideoHit>(item).map(|h| {
                let url = |r: Option<RawRendition>| non_empty(r.and_then(|r| r.url));
                let tiny = url(h.videos.tiny);
                let urls = [url(h.videos.medium), url(h.videos.small), tiny.clone()]
                    .into_iter()
                    .flatten()
                    .collect();
                MediaHit {
                    id: h.id,
                    tags: h.tags,
                    kind,
                    preview_url: tiny,
                    urls,
                }
            }),
        };
        match hit {
            Ok(hit) if hit.pick_url().is_some() => hits.push(hit),
            Ok(hit) => tracing::debug!(id = hit.id, "skipping hit without a usable url"),
            Err(e) => tracing::debug!(error = %e, "skipping malformed hit"),
        }
    }
    Ok(hits)
}

/// Resolver over a fixed set of hits, filtered by tag text.
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    hits: Vec<MediaHit>,
}

impl StaticResolver {
    pub fn new(hits: Vec<MediaHit>) -> Self {
        Self { hits }
    }

    /// Build from a recorded search response.
    pub fn from_response(kind: SearchKind, body: &str) -> EditorResult<Self> {
        Ok(Self::new(parse_pixabay_response(kind, body)?))
    }
}

impl MediaResolver for StaticResolver {
    fn search(&self, query: &MediaQuery) -> EditorResult<Vec<MediaHit>> {
        let needle = query.text.trim().to_lowercase();
        Ok(self
            .hits
            .iter()
            .filter(|h| h.kind == query.kind)
            .filter(|h| needle.is_empty() || h.tags.to_lowercase().contains(&needle))
            .take(query.per_page as usize)
            .cloned()
            .collect())
    }
}

impl Scene {
    /// Make `hit` the background: switches the media mode to the hit's kind and assigns its
    /// preferred URL.
    pub fn apply_media_pick(&mut self, hit: &MediaHit) -> EditorResult<()> {
        let url = hit
            .pick_url()
            .ok_or_else(|| EditorError::validation(format!("media hit {} has no url", hit.id)))?;
        self.set_media(hit.kind.media_kind(), Some(url.to_owned()));
        Ok(())
    }

    /// Switch back to the gradient background, keeping the last picked URL.
    pub fn use_gradient(&mut self) {
        let source = self.media_source.clone();
        self.set_media(MediaKind::Gradient, source);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/resolver.rs"]
mod tests;
