//! User-facing theme configuration
//!
//! [`SimpleThemeConfig`] is the only thing a human edits. Together with the
//! compiled-in presets it is enough to regenerate a full token set.

use crate::color::{hex_to_rgb, ColorError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Background style, selecting a bundle of background/text/border colors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundStyle {
    #[default]
    CleanWhite,
    DimGray,
    WarmBeige,
    DarkMode,
}

impl BackgroundStyle {
    /// Stable id for config/serialization
    pub fn id(self) -> &'static str {
        match self {
            Self::CleanWhite => "clean-white",
            Self::DimGray => "dim-gray",
            Self::WarmBeige => "warm-beige",
            Self::DarkMode => "dark-mode",
        }
    }

    /// User-facing display name
    pub fn display_name(self) -> &'static str {
        match self {
            Self::CleanWhite => "Clean White",
            Self::DimGray => "Dim Gray",
            Self::WarmBeige => "Warm Beige",
            Self::DarkMode => "Dark Mode",
        }
    }

    pub fn all() -> &'static [BackgroundStyle] {
        const STYLES: [BackgroundStyle; 4] = [
            BackgroundStyle::CleanWhite,
            BackgroundStyle::DimGray,
            BackgroundStyle::WarmBeige,
            BackgroundStyle::DarkMode,
        ];
        &STYLES
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::DarkMode)
    }
}

/// Corner roundness, selecting a bundle of radius values
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Roundness {
    Sharp,
    #[default]
    Rounded,
    Full,
}

impl Roundness {
    pub fn id(self) -> &'static str {
        match self {
            Self::Sharp => "sharp",
            Self::Rounded => "rounded",
            Self::Full => "full",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Sharp => "Sharp",
            Self::Rounded => "Rounded",
            Self::Full => "Fully Rounded",
        }
    }

    pub fn all() -> &'static [Roundness] {
        const ROUNDNESS: [Roundness; 3] = [Roundness::Sharp, Roundness::Rounded, Roundness::Full];
        &ROUNDNESS
    }
}

impl Display for BackgroundStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl Display for Roundness {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for BackgroundStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|style| style.id() == s)
            .ok_or_else(|| {
                format!("unknown background style `{s}` (expected clean-white, dim-gray, warm-beige or dark-mode)")
            })
    }
}

impl FromStr for Roundness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|r| r.id() == s)
            .ok_or_else(|| format!("unknown roundness `{s}` (expected sharp, rounded or full)"))
    }
}

/// The small, human-editable theme input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleThemeConfig {
    /// Brand color
    pub primary_color: String,
    /// Defaults to the primary color darkened by 15% when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub background_color: BackgroundStyle,
    #[serde(default)]
    pub roundness: Roundness,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_font: Option<String>,
}

impl SimpleThemeConfig {
    pub fn new(primary_color: impl Into<String>) -> Self {
        Self {
            primary_color: primary_color.into(),
            ..Self::default()
        }
    }

    pub fn with_accent(mut self, accent: impl Into<String>) -> Self {
        self.accent_color = Some(accent.into());
        self
    }

    pub fn with_background(mut self, background: BackgroundStyle) -> Self {
        self.background_color = background;
        self
    }

    pub fn with_roundness(mut self, roundness: Roundness) -> Self {
        self.roundness = roundness;
        self
    }

    pub fn with_fonts(mut self, heading: impl Into<String>, body: impl Into<String>) -> Self {
        self.heading_font = Some(heading.into());
        self.body_font = Some(body.into());
        self
    }

    /// Check that the primary and accent colors parse.
    ///
    /// Generation never requires this; it lets an editor flag a bad color
    /// before it is rendered.
    pub fn validate(&self) -> Result<(), ColorError> {
        hex_to_rgb(&self.primary_color)?;
        if let Some(accent) = &self.accent_color {
            hex_to_rgb(accent)?;
        }
        Ok(())
    }
}

impl Default for SimpleThemeConfig {
    fn default() -> Self {
        Self {
            primary_color: "#10B981".to_string(),
            accent_color: None,
            background_color: BackgroundStyle::default(),
            roundness: Roundness::default(),
            heading_font: None,
            body_font: None,
        }
    }
}
