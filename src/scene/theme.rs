use serde::{Deserialize, Serialize};

use crate::{assets::color::ColorDef, scene::elements::CodePalette};

/// Built-in color themes. The active theme drives the veil color and its default opacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeId {
    #[default]
    DarkCode,
    Midnight,
    Paper,
}

impl ThemeId {
    pub const ALL: [ThemeId; 3] = [ThemeId::DarkCode, ThemeId::Midnight, ThemeId::Paper];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeId::DarkCode => "dark-code",
            ThemeId::Midnight => "midnight",
            ThemeId::Paper => "paper",
        }
    }

    /// Look a theme up by id, falling back to the first theme like the editor UI does.
    pub fn from_id_or_default(id: &str) -> ThemeId {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == id)
            .unwrap_or_default()
    }

    pub fn theme(self) -> Theme {
        let hex = |r, g, b| ColorDef::from_rgba8(r, g, b, 255);
        match self {
            ThemeId::DarkCode => Theme {
                id: self,
                name: "Dark Code",
                text: hex(0xc9, 0xd1, 0xd9),
                accent: hex(0x7e, 0xe7, 0x87),
                veil: hex(0x00, 0x00, 0x00),
                veil_opacity: 0.5,
                bg_gradient: [hex(0x0d, 0x11, 0x17), hex(0x1e, 0x1e, 0x1e)],
                keyword: hex(0x79, 0xc0, 0xff),
                string: hex(0xa5, 0xd6, 0xff),
                number: hex(0xff, 0xab, 0x70),
                comment: hex(0x8b, 0x94, 0x9e),
            },
            ThemeId::Midnight => Theme {
                id: self,
                name: "Midnight",
                text: hex(0xe6, 0xed, 0xf3),
                accent: hex(0x00, 0xe7, 0xa7),
                veil: hex(0x0b, 0x12, 0x20),
                veil_opacity: 0.55,
                bg_gradient: [hex(0x0b, 0x12, 0x20), hex(0x10, 0x1b, 0x30)],
                keyword: hex(0x5a, 0xb5, 0xff),
                string: hex(0xff, 0xd5, 0x80),
                number: hex(0xff, 0xa6, 0x57),
                comment: hex(0x7d, 0x85, 0x90),
            },
            ThemeId::Paper => Theme {
                id: self,
                name: "Paper",
                text: hex(0x1f, 0x23, 0x28),
                accent: hex(0x09, 0x69, 0xda),
                veil: hex(0xff, 0xff, 0xff),
                veil_opacity: 0.18,
                bg_gradient: [hex(0xf7, 0xf7, 0xf7), hex(0xea, 0xee, 0xf2)],
                keyword: hex(0x66, 0x39, 0xba),
                string: hex(0x05, 0x50, 0xae),
                number: hex(0xbc, 0x4c, 0x00),
                comment: hex(0x6e, 0x77, 0x81),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub id: ThemeId,
    pub name: &'static str,
    /// Default text color.
    pub text: ColorDef,
    pub accent: ColorDef,
    /// Base veil color.
    pub veil: ColorDef,
    pub veil_opacity: f64,
    /// Gradient used when no background media is selected.
    pub bg_gradient: [ColorDef; 2],
    pub keyword: ColorDef,
    pub string: ColorDef,
    pub number: ColorDef,
    pub comment: ColorDef,
}

impl Theme {
    /// The theme's syntax colors layered over the default code palette.
    pub fn code_palette(&self) -> CodePalette {
        CodePalette {
            keyword: self.keyword,
            string: self.string,
            number: self.number,
            comment: self.comment,
            ..CodePalette::default()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/theme.rs"]
mod tests;
