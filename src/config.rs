use std::path::PathBuf;

use crate::{
    assets::color::ColorDef, export::encode::ExportFormat, render::backend::RenderSettings,
    scene::theme::ThemeId,
};

pub const ENV_STATE: &str = "MOTIVERSERA_STATE";
pub const ENV_FONT_DIR: &str = "MOTIVERSERA_FONT_DIR";
pub const ENV_SYSTEM_FONTS: &str = "MOTIVERSERA_SYSTEM_FONTS";
pub const ENV_THEME: &str = "MOTIVERSERA_THEME";
pub const ENV_CLEAR: &str = "MOTIVERSERA_CLEAR";
pub const ENV_EXPORT_FORMAT: &str = "MOTIVERSERA_EXPORT_FORMAT";

pub const DEFAULT_STATE_FILE: &str = "motiversera_editor_state.json";

/// Process-level settings for the editor and the CLI.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    /// JSON file backing the persisted scene.
    pub state_path: PathBuf,
    pub font_dirs: Vec<PathBuf>,
    pub load_system_fonts: bool,
    /// Theme for freshly created scenes. `None` keeps the built-in default.
    pub theme: Option<ThemeId>,
    pub clear_rgba: Option<[u8; 4]>,
    pub export_format: ExportFormat,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_FILE),
            font_dirs: Vec::new(),
            load_system_fonts: true,
            theme: None,
            clear_rgba: None,
            export_format: ExportFormat::Png,
        }
    }
}

impl EditorConfig {
    /// Read `MOTIVERSERA_*` variables. Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_STATE) {
            cfg.state_path = PathBuf::from(path);
        }
        if let Some(dirs) = get(ENV_FONT_DIR) {
            cfg.font_dirs = std::env::split_paths(&dirs).collect();
        }
        if let Some(v) = get(ENV_SYSTEM_FONTS) {
            match parse_flag(&v) {
                Some(on) => cfg.load_system_fonts = on,
                None => tracing::warn!(var = ENV_SYSTEM_FONTS, value = %v, "expected a boolean"),
            }
        }
        if let Some(v) = get(ENV_THEME) {
            match ThemeId::ALL.into_iter().find(|t| t.as_str() == v.trim()) {
                Some(theme) => cfg.theme = Some(theme),
                None => tracing::warn!(var = ENV_THEME, value = %v, "unknown theme"),
            }
        }
        if let Some(v) = get(ENV_CLEAR) {
            match ColorDef::parse(&v) {
                Ok(c) => cfg.clear_rgba = Some(c.to_rgba8_straight()),
                Err(err) => tracing::warn!(var = ENV_CLEAR, %err, "ignoring clear color"),
            }
        }
        if let Some(v) = get(ENV_EXPORT_FORMAT) {
            match v.parse() {
                Ok(format) => cfg.export_format = format,
                Err(err) => {
                    tracing::warn!(var = ENV_EXPORT_FORMAT, %err, "ignoring export format")
                }
            }
        }
        cfg
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            clear_rgba: self.clear_rgba,
            font_dirs: self.font_dirs.clone(),
            load_system_fonts: self.load_system_fonts,
        }
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
