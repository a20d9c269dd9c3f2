use crate::{
    assets::background::BackgroundLoader,
    foundation::error::EditorResult,
    render::backend::{BackgroundSource, FrameRGBA, RenderBackend},
    scene::model::Scene,
};

/// Keeps the last preview frame and redraws only when the scene or background changed.
///
/// While the background image is still decoding the whole frame is deferred: the previous
/// frame stays visible and the next refresh after the load completes draws everything at once.
pub struct LivePreview {
    backend: Box<dyn RenderBackend>,
    drawn: Option<(u64, u64)>,
    frame: Option<FrameRGBA>,
}

impl std::fmt::Debug for LivePreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LivePreview")
            .field("drawn", &self.drawn)
            .field("has_frame", &self.frame.is_some())
            .finish()
    }
}

impl LivePreview {
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            backend,
            drawn: None,
            frame: None,
        }
    }

    pub fn frame(&self) -> Option<&FrameRGBA> {
        self.frame.as_ref()
    }

    pub fn backend_mut(&mut self) -> &mut dyn RenderBackend {
        self.backend.as_mut()
    }

    /// Force the next refresh to redraw, e.g. after swapping in a different scene.
    pub fn invalidate(&mut self) {
        self.drawn = None;
    }

    /// Redraw if needed. Returns `true` when a new frame was produced.
    pub fn refresh(&mut self, scene: &Scene, loader: &BackgroundLoader) -> EditorResult<bool> {
        let key = (scene.revision(), loader.revision());
        if self.drawn == Some(key) && self.frame.is_some() {
            return Ok(false);
        }

        let background = BackgroundSource::from_loader(scene, loader);
        if matches!(background, BackgroundSource::Pending) {
            tracing::debug!(revision = scene.revision(), "preview deferred until background loads");
            return Ok(false);
        }

        let frame = self.backend.render_scene(scene, background)?;
        self.frame = Some(frame);
        self.drawn = Some(key);
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
