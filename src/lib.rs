//! Motiversera is the editing core behind a 9:16 social-graphic canvas editor.
//!
//! Everything is laid out on a fixed 1080×1920 logical canvas:
//!
//! - Mutate a [`Scene`] (background, filters, tint, text, one code quote, shapes)
//! - Rasterize it with a [`RenderBackend`] such as [`CpuBackend`], live through [`LivePreview`]
//! - Drive drag, resize and inline editing with the [`InteractionController`]
//! - Export PNG or JPEG with [`export_scene`] and persist state through a [`SceneStore`]
#![forbid(unsafe_code)]

/// Colors, image decoding, fonts and the background image loader.
pub mod assets;
/// Process configuration read from the environment.
pub mod config;
/// Encoding and crop.
pub mod export;
pub mod foundation;
/// Screen/logical mapping, hit testing and pointer interaction.
pub mod interact;
/// Background media search contract.
pub mod media;
/// Scene stores and autosave.
pub mod persist;
/// Rasterizer, live preview and text shaping.
pub mod render;
/// The scene model.
pub mod scene;
pub mod syntax;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8Premul, Size, Vec2};
pub use crate::foundation::error::{EditorError, EditorResult};

pub use crate::assets::background::{BackgroundLoader, FsImageFetcher, ImageFetcher, LoadState};
pub use crate::assets::color::{ColorDef, Fill};
pub use crate::assets::fonts::FontBook;
pub use crate::config::EditorConfig;
pub use crate::export::crop::{AspectPreset, CropSettings};
pub use crate::export::encode::{ExportFormat, ExportOptions, ExportedImage, export_scene};
pub use crate::interact::controller::{EditKey, Interaction, InteractionController};
pub use crate::interact::hit::{Handle, PointerTarget, hit_test};
pub use crate::interact::mapper::CoordinateMapper;
pub use crate::media::resolver::{
    MediaHit, MediaQuery, MediaResolver, SearchKind, StaticResolver, search_or_empty,
};
pub use crate::persist::store::{
    Autosave, JsonFileStore, MemoryStore, SceneStore, load_scene_or_default,
};
pub use crate::render::backend::{
    BackendKind, BackgroundSource, FrameRGBA, RenderBackend, RenderSettings, create_backend,
};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::preview::LivePreview;
pub use crate::scene::elements::{QuoteElement, ShapeElement, ShapeKind, TextElement};
pub use crate::scene::model::{BlendMode, ElementRef, MediaKind, Scene};
pub use crate::scene::patch::{ElementPatch, QuotePatch, ShapePatch, TextPatch};
pub use crate::scene::snapshot::SceneSnapshot;
pub use crate::scene::theme::ThemeId;
pub use crate::syntax::tokenizer::{TokenRole, tokenize};
