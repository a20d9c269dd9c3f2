use serde::{Deserialize, Serialize};

use crate::{
    assets::color::{ColorDef, Fill},
    syntax::tokenizer::TokenRole,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// CSS-style numeric font weight (100..=900).
///
/// Accepts `"normal"`, `"bold"`, numeric strings and numbers; serializes `400`/`700` back to the
/// keywords so snapshots stay compatible with the browser editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const BOLD: FontWeight = FontWeight(700);

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::NORMAL),
            "bold" => Ok(Self::BOLD),
            "lighter" => Ok(FontWeight(300)),
            "bolder" => Ok(FontWeight(800)),
            other => other
                .parse::<u16>()
                .map(Self::clamped)
                .map_err(|_| format!("invalid font weight \"{s}\"")),
        }
    }

    fn clamped(w: u16) -> Self {
        FontWeight(w.clamp(1, 1000))
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl Serialize for FontWeight {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match *self {
            Self::NORMAL => serializer.serialize_str("normal"),
            Self::BOLD => serializer.serialize_str("bold"),
            FontWeight(w) => serializer.serialize_str(&w.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Str(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(n) if n.is_finite() && n > 0.0 => {
                Ok(FontWeight::clamped(n.round().min(1000.0) as u16))
            }
            Repr::Num(n) => Err(serde::de::Error::custom(format!(
                "invalid font weight {n}"
            ))),
            Repr::Str(s) => FontWeight::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Shadow {
    pub enabled: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: ColorDef,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            enabled: false,
            offset_x: 2.0,
            offset_y: 2.0,
            blur: 4.0,
            color: ColorDef::BLACK,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStroke {
    pub enabled: bool,
    pub width: f64,
    pub color: ColorDef,
}

impl Default for TextStroke {
    fn default() -> Self {
        Self {
            enabled: false,
            width: 1.0,
            color: ColorDef::BLACK,
        }
    }
}

/// A free-floating text overlay. `(x, y)` is the center of the text block in logical space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextElement {
    pub id: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub font_family: String,
    pub color: ColorDef,
    pub font_weight: FontWeight,
    pub text_align: TextAlign,
    /// Degrees, clockwise.
    pub rotation: f64,
    pub opacity: f64,
    /// Extra advance per glyph, in px.
    pub letter_spacing: f64,
    /// Multiplier of `font_size`.
    pub line_height: f64,
    pub shadow: Shadow,
    pub stroke: TextStroke,
}

impl TextElement {
    pub fn template(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: "Your text here".to_owned(),
            x: 540.0,
            y: 960.0,
            font_size: 48.0,
            font_family: "Inter, Arial, sans-serif".to_owned(),
            color: ColorDef::WHITE,
            font_weight: FontWeight::NORMAL,
            text_align: TextAlign::Center,
            rotation: 0.0,
            opacity: 1.0,
            letter_spacing: 0.0,
            line_height: 1.2,
            shadow: Shadow::default(),
            stroke: TextStroke::default(),
        }
    }
}

impl Default for TextElement {
    fn default() -> Self {
        Self::template(String::new())
    }
}

/// Colors for each semantic role of the code-snippet tokenizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodePalette {
    pub keyword: ColorDef,
    pub string: ColorDef,
    pub comment: ColorDef,
    pub number: ColorDef,
    pub operator: ColorDef,
    pub variable: ColorDef,
    pub function: ColorDef,
}

impl Default for CodePalette {
    fn default() -> Self {
        let hex = |r, g, b| ColorDef::from_rgba8(r, g, b, 255);
        Self {
            keyword: hex(0xff, 0x6b, 0x6b),
            string: hex(0x4e, 0xcd, 0xc4),
            comment: hex(0x95, 0xa5, 0xa6),
            number: hex(0xf3, 0x9c, 0x12),
            operator: hex(0xe7, 0x4c, 0x3c),
            variable: hex(0x34, 0x98, 0xdb),
            function: hex(0x9b, 0x59, 0xb6),
        }
    }
}

impl CodePalette {
    /// Color for a token role; `None` for plain text, which uses the element color.
    pub fn color_for(&self, role: TokenRole) -> Option<ColorDef> {
        match role {
            TokenRole::Plain => None,
            TokenRole::Comment => Some(self.comment),
            TokenRole::Keyword => Some(self.keyword),
            TokenRole::String => Some(self.string),
            TokenRole::Number => Some(self.number),
            TokenRole::Operator => Some(self.operator),
            TokenRole::Function => Some(self.function),
        }
    }
}

/// The single multi-line, optionally syntax-colored text element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteElement {
    #[serde(flatten)]
    pub base: TextElement,
    /// Bounding-box width; when present the text wraps inside it and corner handles resize it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default = "default_true")]
    pub is_code_snippet: bool,
    #[serde(default)]
    pub code_colors: CodePalette,
}

fn default_true() -> bool {
    true
}

impl QuoteElement {
    pub const DEFAULT_TEXT: &'static str =
        "while (struggling) { keepLearning(); } // Success is loading...";

    /// The template every freshly added quote starts from.
    pub fn template(id: impl Into<String>) -> Self {
        Self {
            base: TextElement {
                text: Self::DEFAULT_TEXT.to_owned(),
                font_size: 32.0,
                font_family: "Monaco, Consolas, monospace".to_owned(),
                font_weight: FontWeight::BOLD,
                line_height: 1.4,
                ..TextElement::template(id)
            },
            width: None,
            height: None,
            is_code_snippet: true,
            code_colors: CodePalette::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.base.id
    }

    /// Both box dimensions, when the quote is box-sized.
    pub fn box_size(&self) -> Option<(f64, f64)> {
        self.width.zip(self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
    Arrow,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Line => "line",
            ShapeKind::Arrow => "arrow",
        }
    }
}

impl std::str::FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rectangle" | "rect" => Ok(ShapeKind::Rectangle),
            "circle" | "ellipse" => Ok(ShapeKind::Circle),
            "line" => Ok(ShapeKind::Line),
            "arrow" => Ok(ShapeKind::Arrow),
            _ => Err(format!("unknown shape type \"{s}\"")),
        }
    }
}

/// A vector shape. `(x, y)` is the center of its bounding box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Fill,
    pub stroke: ColorDef,
    pub stroke_width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_corner_radius")]
    pub corner_radius: f64,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_corner_radius() -> f64 {
    4.0
}

impl ShapeElement {
    pub fn template(id: impl Into<String>, kind: ShapeKind) -> Self {
        let (width, height, fill) = match kind {
            ShapeKind::Line | ShapeKind::Arrow => (200.0, 5.0, Fill::Transparent),
            ShapeKind::Circle => (150.0, 150.0, Fill::Color(ColorDef::WHITE)),
            ShapeKind::Rectangle => (150.0, 100.0, Fill::Color(ColorDef::WHITE)),
        };
        Self {
            id: id.into(),
            kind,
            x: 540.0,
            y: 960.0,
            width,
            height,
            fill,
            stroke: ColorDef::BLACK,
            stroke_width: 2.0,
            opacity: 1.0,
            rotation: 0.0,
            corner_radius: default_corner_radius(),
        }
    }

    /// Unrotated bounding box in logical space.
    pub fn bounds(&self) -> kurbo::Rect {
        kurbo::Rect::from_center_size((self.x, self.y), (self.width, self.height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/elements.rs"]
mod tests;
