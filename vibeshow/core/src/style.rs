//! Art Style Catalogue
//!
//! The closed set of visual styles a slideshow can be rendered in. A style is
//! only ever used as a lookup key (for labels) and as text injected into
//! generation requests.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Visual style applied to every slide of a slideshow
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtStyle {
    /// Kidcore Aesthetic
    Kidcore,
    /// Lisa Frank Style
    LisaFrank,
    /// Van Gogh Impressionism
    VanGogh,
    /// Furry Art Style
    Furry,
    /// Classical Portrait
    Portrait,
    /// Saturday Morning Cartoon
    Cartoon,
    /// Tex Avery Cartoon Style
    TexAvery,
    /// Marker Art
    Marker,
    /// Crayon Drawing
    Crayon,
    /// Squid Game Aesthetic
    SquidGame,
    /// Claymation
    Claymation,
    /// Play-Doh Sculpture
    PlayDoh,
    /// Retro Video Game
    VideoGame,
    /// Fortnite Skin Style
    Fortnite,
    /// Vaporwave
    Vaporwave,
    /// Pixel Art
    PixelArt,
}

impl ArtStyle {
    /// Every style, in catalogue order
    pub const ALL: [ArtStyle; 16] = [
        Self::Kidcore,
        Self::LisaFrank,
        Self::VanGogh,
        Self::Furry,
        Self::Portrait,
        Self::Cartoon,
        Self::TexAvery,
        Self::Marker,
        Self::Crayon,
        Self::SquidGame,
        Self::Claymation,
        Self::PlayDoh,
        Self::VideoGame,
        Self::Fortnite,
        Self::Vaporwave,
        Self::PixelArt,
    ];

    /// Descriptive text used inside generation requests
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Kidcore => "Kidcore Aesthetic",
            Self::LisaFrank => "Lisa Frank Style",
            Self::VanGogh => "Van Gogh Impressionism",
            Self::Furry => "Furry Art Style",
            Self::Portrait => "Classical Portrait",
            Self::Cartoon => "Saturday Morning Cartoon",
            Self::TexAvery => "Tex Avery Cartoon Style",
            Self::Marker => "Marker Art",
            Self::Crayon => "Crayon Drawing",
            Self::SquidGame => "Squid Game Aesthetic",
            Self::Claymation => "Claymation",
            Self::PlayDoh => "Play-Doh Sculpture",
            Self::VideoGame => "Retro Video Game",
            Self::Fortnite => "Fortnite Skin Style",
            Self::Vaporwave => "Vaporwave",
            Self::PixelArt => "Pixel Art",
        }
    }

    /// Short label for style pickers
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Kidcore => "Kidcore",
            Self::LisaFrank => "Lisa Frank",
            Self::VanGogh => "Van Gogh",
            Self::Furry => "Furry",
            Self::Portrait => "Portrait",
            Self::Cartoon => "Cartoon",
            Self::TexAvery => "Tex Avery",
            Self::Marker => "Marker",
            Self::Crayon => "Crayon",
            Self::SquidGame => "Squid Game",
            Self::Claymation => "Claymation",
            Self::PlayDoh => "Play-Doh",
            Self::VideoGame => "Video Game",
            Self::Fortnite => "Fortnite",
            Self::Vaporwave => "Vaporwave",
            Self::PixelArt => "Pixel Art",
        }
    }

    /// Kebab-case identifier (`van-gogh`), also the serde representation
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(self.label())
    }
}

impl std::fmt::Display for ArtStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Returned when a string names no known style
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown art style: {0}")]
pub struct UnknownStyle(pub String);

impl FromStr for ArtStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = slugify(s);
        Self::ALL
            .into_iter()
            .find(|style| {
                style.slug() == wanted
                    || slugify(style.description()) == wanted
                    || slugify(&format!("{style:?}")) == wanted
            })
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}

/// Lowercase, alphanumeric runs joined by single dashes
fn slugify(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
