use std::{io::Cursor, path::Path, str::FromStr};

use anyhow::Context as _;
use image::ImageEncoder as _;
use serde::{Deserialize, Serialize};

use crate::{
    assets::decode::unpremultiply_rgba8_in_place,
    export::crop::crop_rgba8,
    foundation::{
        core::Canvas,
        error::{EditorError, EditorResult},
    },
    render::backend::{BackgroundSource, FrameRGBA, RenderBackend},
    scene::model::Scene,
};

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless, keeps transparency.
    #[default]
    Png,
    /// Flattened over black.
    Jpeg { quality: u8 },
}

impl ExportFormat {
    pub fn jpeg() -> Self {
        ExportFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg { .. } => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg { .. } => "image/jpeg",
        }
    }

    /// Guess from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

impl FromStr for ExportFormat {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::jpeg()),
            other => Err(EditorError::validation(format!(
                "unsupported export format \"{other}\""
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Cut the frame to the scene's crop rectangle before encoding.
    pub apply_crop: bool,
}

/// An encoded export, ready to be written or handed to a download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedImage {
    pub width: u32,
    pub height: u32,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportedImage {
    pub fn write_to(&self, path: &Path) -> EditorResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("write export '{}'", path.display()))?;
        Ok(())
    }
}

/// Render `scene` at full canvas size and encode it.
///
/// Nothing is produced unless every step succeeds: a background image that is still loading
/// or failed to load aborts the export.
#[tracing::instrument(skip_all, fields(format = opts.format.extension(), crop = opts.apply_crop))]
pub fn export_scene(
    backend: &mut dyn RenderBackend,
    scene: &Scene,
    background: BackgroundSource<'_>,
    opts: &ExportOptions,
) -> EditorResult<ExportedImage> {
    match background {
        BackgroundSource::Pending => {
            return Err(EditorError::export("background image is still loading"));
        }
        BackgroundSource::Failed => {
            return Err(EditorError::export("background image failed to load"));
        }
        BackgroundSource::Unneeded | BackgroundSource::Ready(_) => {}
    }

    let mut frame = backend.render_scene(scene, background).map_err(|e| match e {
        EditorError::ResourceLoad(msg) => EditorError::export(msg),
        other => other,
    })?;
    let canvas = Canvas {
        width: frame.width,
        height: frame.height,
    };

    if opts.apply_crop && !scene.crop().is_full(canvas) {
        let rect = scene.crop().pixel_rect(canvas)?;
        frame = FrameRGBA {
            width: rect.width,
            height: rect.height,
            data: crop_rgba8(&frame.data, frame.width, rect),
            premultiplied: frame.premultiplied,
        };
    }

    let bytes = encode_frame(&frame, opts.format)?;
    tracing::debug!(
        width = frame.width,
        height = frame.height,
        bytes = bytes.len(),
        "export encoded"
    );
    Ok(ExportedImage {
        width: frame.width,
        height: frame.height,
        format: opts.format,
        bytes,
    })
}

/// Encode a frame. PNG gets straight alpha; JPEG drops alpha after flattening over black.
pub fn encode_frame(frame: &FrameRGBA, format: ExportFormat) -> EditorResult<Vec<u8>> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(EditorError::export("frame byte length does not match its size"));
    }

    let mut out = Vec::new();
    match format {
        ExportFormat::Png => {
            let mut straight = frame.data.clone();
            if frame.premultiplied {
                unpremultiply_rgba8_in_place(&mut straight);
            }
            image::codecs::png::PngEncoder::new(Cursor::new(&mut out))
                .write_image(
                    &straight,
                    frame.width,
                    frame.height,
                    image::ExtendedColorType::Rgba8,
                )
                .map_err(|e| EditorError::export(format!("png encode failed: {e}")))?;
        }
        ExportFormat::Jpeg { quality } => {
            let rgb = flatten_over_black(&frame.data, frame.premultiplied);
            image::codecs::jpeg::JpegEncoder::new_with_quality(
                Cursor::new(&mut out),
                quality.clamp(1, 100),
            )
            .write_image(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
            .map_err(|e| EditorError::export(format!("jpeg encode failed: {e}")))?;
        }
    }
    Ok(out)
}

fn flatten_over_black(data: &[u8], premultiplied: bool) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(data.len() / 4 * 3);
    for px in data.chunks_exact(4) {
        if premultiplied {
            rgb.extend_from_slice(&px[..3]);
        } else {
            let a = u16::from(px[3]);
            rgb.extend(px[..3].iter().map(|c| ((u16::from(*c) * a + 127) / 255) as u8));
        }
    }
    rgb
}

#[cfg(test)]
#[path = "../../tests/unit/export/encode.rs"]
mod tests;
