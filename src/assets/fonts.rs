use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use usvg::fontdb;

/// One concrete font face picked for a CSS family list.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    pub id: fontdb::ID,
    /// Primary family name of the face as reported by the font file.
    pub family: String,
    pub data: Arc<Vec<u8>>,
    /// Face index inside a collection (`.ttc`), `0` for single-face files.
    pub index: u32,
}

/// Font discovery backed by `fontdb`: system fonts plus configured font directories.
///
/// Element font families are CSS-style lists (`"Monaco, Consolas, monospace"`); the first
/// family that exists wins, generic keywords map to `fontdb` generic families, and the first
/// face in the database is the last resort so text still renders on minimal systems.
pub struct FontBook {
    db: fontdb::Database,
    cache: HashMap<(String, u16), Option<ResolvedFont>>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .field("cached_queries", &self.cache.len())
            .finish()
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::empty()
    }
}

impl FontBook {
    /// A font book with no faces; every query resolves to `None`.
    pub fn empty() -> Self {
        Self {
            db: fontdb::Database::new(),
            cache: HashMap::new(),
        }
    }

    /// Load system fonts (optional) and every `ttf`/`otf`/`ttc` file under `font_dirs`.
    pub fn load(load_system_fonts: bool, font_dirs: &[PathBuf]) -> Self {
        let mut book = Self::empty();
        if load_system_fonts {
            book.db.load_system_fonts();
        }
        for dir in font_dirs {
            load_fonts_from_dir(&mut book.db, dir);
        }
        tracing::debug!(faces = book.db.len(), "font book loaded");
        book
    }

    /// Register raw font bytes (e.g. a font shipped alongside a scene).
    pub fn add_font_data(&mut self, bytes: Vec<u8>) {
        self.db.load_font_data(bytes);
        self.cache.clear();
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Pick a face for a CSS family list and numeric weight.
    pub fn resolve(&mut self, family_list: &str, weight: u16) -> Option<ResolvedFont> {
        let key = (family_list.to_owned(), weight);
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }

        let resolved = self.query(family_list, weight);
        if resolved.is_none() {
            tracing::warn!(family_list, weight, "no font face available");
        }
        self.cache.insert(key, resolved.clone());
        resolved
    }

    fn query(&self, family_list: &str, weight: u16) -> Option<ResolvedFont> {
        let names = parse_family_list(family_list);
        let mut families: Vec<fontdb::Family<'_>> = names.iter().map(|n| to_family(n)).collect();
        families.push(fontdb::Family::SansSerif);

        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(weight),
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };

        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))?;
        let face = self.db.face(id)?;
        let family = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_default();
        let (data, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))?;

        Some(ResolvedFont {
            id,
            family,
            data: Arc::new(data),
            index,
        })
    }
}

/// Split a CSS `font-family` value into unquoted names, keeping order.
pub fn parse_family_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|part| part.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

fn to_family(name: &str) -> fontdb::Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => fontdb::Family::Serif,
        "sans-serif" | "system-ui" => fontdb::Family::SansSerif,
        "monospace" => fontdb::Family::Monospace,
        "cursive" => fontdb::Family::Cursive,
        "fantasy" => fontdb::Family::Fantasy,
        _ => fontdb::Family::Name(name),
    }
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(err) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), %err, "skipping unreadable font");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
