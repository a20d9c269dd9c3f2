use std::path::PathBuf;

use crate::{
    assets::{
        background::{BackgroundLoader, LoadState},
        decode::PreparedImage,
        fonts::FontBook,
    },
    foundation::error::EditorResult,
    render::text::TextShaper,
    scene::model::Scene,
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames coming out of a backend are **premultiplied alpha**; export converts to straight alpha
/// before encoding. The `premultiplied` flag keeps that explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// What the rasterizer knows about the background image of the scene it is drawing.
#[derive(Clone, Copy, Debug)]
pub enum BackgroundSource<'a> {
    /// The scene has no image background.
    Unneeded,
    /// The image has not finished decoding; nothing may be drawn yet.
    Pending,
    Ready(&'a PreparedImage),
    /// The image could not be loaded.
    Failed,
}

impl<'a> BackgroundSource<'a> {
    /// Match the scene's wanted image against the loader's current state.
    pub fn from_loader(scene: &Scene, loader: &'a BackgroundLoader) -> Self {
        let Some(wanted) = scene.background_image_source() else {
            return BackgroundSource::Unneeded;
        };
        match loader.state() {
            LoadState::Ready { source, image } if source == wanted => {
                BackgroundSource::Ready(image.as_ref())
            }
            LoadState::Failed { source, .. } if source == wanted => BackgroundSource::Failed,
            _ => BackgroundSource::Pending,
        }
    }
}

/// A renderer that draws a whole [`Scene`] into a [`FrameRGBA`].
pub trait RenderBackend {
    /// Draw the scene at logical canvas size.
    ///
    /// Fails with a resource-load error while the background image is still pending.
    fn render_scene(
        &mut self,
        scene: &Scene,
        background: BackgroundSource<'_>,
    ) -> EditorResult<FrameRGBA>;

    /// Shaper used for text; hit testing measures with the same instance the frame was drawn
    /// with.
    fn text_shaper(&mut self) -> &mut TextShaper;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    #[default]
    Cpu,
}

/// Backend-agnostic settings.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    /// If set, backends clear the frame to this straight RGBA8 color before drawing.
    pub clear_rgba: Option<[u8; 4]>,
    /// Extra directories scanned for `ttf`/`otf`/`ttc` files.
    pub font_dirs: Vec<PathBuf>,
    pub load_system_fonts: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_rgba: None,
            font_dirs: Vec::new(),
            load_system_fonts: true,
        }
    }
}

impl RenderSettings {
    pub fn load_fonts(&self) -> FontBook {
        FontBook::load(self.load_system_fonts, &self.font_dirs)
    }
}

/// Create a rendering backend implementation.
pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
) -> EditorResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new(
            settings.clone(),
        ))),
    }
}
