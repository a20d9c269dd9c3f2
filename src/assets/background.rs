use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode::{PreparedImage, decode_image},
    foundation::error::{EditorError, EditorResult},
};

/// Source of encoded image bytes for background images.
pub trait ImageFetcher {
    fn fetch(&self, source: &str) -> EditorResult<Vec<u8>>;
}

/// Reads plain paths and `file://` URLs, resolving relative paths against `root`.
#[derive(Clone, Debug)]
pub struct FsImageFetcher {
    root: PathBuf,
}

impl FsImageFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, source: &str) -> EditorResult<PathBuf> {
        if source.starts_with("http://") || source.starts_with("https://") {
            return Err(EditorError::resource_load(format!(
                "remote image '{source}' must be downloaded by the host first"
            )));
        }
        let raw = source.strip_prefix("file://").unwrap_or(source);
        if raw.is_empty() {
            return Err(EditorError::resource_load("empty image source"));
        }
        let path = Path::new(raw);
        Ok(if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        })
    }
}

impl ImageFetcher for FsImageFetcher {
    fn fetch(&self, source: &str) -> EditorResult<Vec<u8>> {
        let path = self.resolve(source)?;
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read background image from '{}'", path.display()))?;
        Ok(bytes)
    }
}

/// Where the current background image is in its load lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
    Idle,
    Loading {
        source: String,
    },
    Ready {
        source: String,
        image: Arc<PreparedImage>,
    },
    Failed {
        source: String,
        error: String,
    },
}

impl LoadState {
    pub fn source(&self) -> Option<&str> {
        match self {
            LoadState::Idle => None,
            LoadState::Loading { source }
            | LoadState::Ready { source, .. }
            | LoadState::Failed { source, .. } => Some(source),
        }
    }
}

/// Handle for one in-flight load. Completing with a ticket from an older generation is a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub source: String,
}

/// Tracks the background image the scene wants and discards results for superseded sources.
///
/// A host calls [`BackgroundLoader::sync`] whenever the scene's image source may have changed,
/// fetches and decodes off the render path for the returned ticket, then hands the result
/// back through [`BackgroundLoader::complete`]. A failed source stays failed across `sync`
/// calls until it is picked again through [`BackgroundLoader::reselect`].
#[derive(Debug)]
pub struct BackgroundLoader {
    state: LoadState,
    generation: u64,
    revision: u64,
}

impl Default for BackgroundLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundLoader {
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
            generation: 0,
            revision: 0,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Bumped on every state transition.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Decoded image for `source`, if that exact source finished loading.
    pub fn ready_image(&self, source: &str) -> Option<&Arc<PreparedImage>> {
        match &self.state {
            LoadState::Ready { source: s, image } if s == source => Some(image),
            _ => None,
        }
    }

    /// Point the loader at `wanted`. Returns a ticket when a new load must start.
    pub fn sync(&mut self, wanted: Option<&str>) -> Option<LoadTicket> {
        let Some(wanted) = wanted else {
            if self.state != LoadState::Idle {
                self.generation += 1;
                self.set_state(LoadState::Idle);
            }
            return None;
        };
        if self.state.source() == Some(wanted) {
            return None;
        }

        self.generation += 1;
        self.set_state(LoadState::Loading {
            source: wanted.to_owned(),
        });
        tracing::debug!(source = wanted, generation = self.generation, "background load started");
        Some(LoadTicket {
            generation: self.generation,
            source: wanted.to_owned(),
        })
    }

    /// Like [`BackgroundLoader::sync`], for an explicit user pick: picking the source that
    /// last failed starts a fresh load instead of keeping the failure.
    pub fn reselect(&mut self, wanted: Option<&str>) -> Option<LoadTicket> {
        let failed_again = wanted.is_some_and(
            |w| matches!(&self.state, LoadState::Failed { source, .. } if source == w),
        );
        if failed_again {
            tracing::debug!(source = ?wanted, "retrying failed background");
            self.generation += 1;
            self.set_state(LoadState::Idle);
        }
        self.sync(wanted)
    }

    /// Apply a finished load. Returns `false` when the ticket was superseded.
    pub fn complete(&mut self, ticket: &LoadTicket, result: EditorResult<PreparedImage>) -> bool {
        let current = matches!(&self.state, LoadState::Loading { source } if *source == ticket.source);
        if ticket.generation != self.generation || !current {
            tracing::warn!(
                source = %ticket.source,
                generation = ticket.generation,
                "discarding stale background load"
            );
            return false;
        }

        let source = ticket.source.clone();
        match result {
            Ok(image) => {
                tracing::debug!(%source, width = image.width, height = image.height, "background ready");
                self.set_state(LoadState::Ready {
                    source,
                    image: Arc::new(image),
                });
            }
            Err(err) => {
                tracing::warn!(%source, %err, "background image failed to load");
                self.set_state(LoadState::Failed {
                    source,
                    error: err.to_string(),
                });
            }
        }
        true
    }

    /// Synchronous `sync` + fetch + decode + `complete`, for batch callers like export.
    pub fn load_blocking(&mut self, fetcher: &dyn ImageFetcher, wanted: Option<&str>) -> &LoadState {
        if let Some(ticket) = self.sync(wanted) {
            let result = fetch_and_decode(fetcher, &ticket.source);
            self.complete(&ticket, result);
        }
        &self.state
    }

    fn set_state(&mut self, state: LoadState) {
        self.state = state;
        self.revision += 1;
    }
}

pub fn fetch_and_decode(fetcher: &dyn ImageFetcher, source: &str) -> EditorResult<PreparedImage> {
    let bytes = fetcher.fetch(source)?;
    decode_image(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/background.rs"]
mod tests;
