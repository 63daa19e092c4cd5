//! Compiled-in preset tables for background styles and corner roundness.

use crate::theme::{BackgroundStyle, Roundness};

/// Base colors for one background style
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackgroundPreset {
    pub bg_primary: &'static str,
    pub bg_secondary: &'static str,
    pub bg_tertiary: &'static str,
    pub bg_card: &'static str,
    pub text_primary: &'static str,
    pub text_secondary: &'static str,
    pub text_tertiary: &'static str,
    pub text_muted: &'static str,
    pub border_primary: &'static str,
    pub border_secondary: &'static str,
    pub border_hover: &'static str,
}

/// Radius values for one roundness level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundnessPreset {
    pub sm: &'static str,
    pub md: &'static str,
    pub lg: &'static str,
    pub xl: &'static str,
    pub full: &'static str,
    pub button: &'static str,
    pub card: &'static str,
}

const CLEAN_WHITE: BackgroundPreset = BackgroundPreset {
    bg_primary: "#ffffff",
    bg_secondary: "#f9fafb",
    bg_tertiary: "#f3f4f6",
    bg_card: "#ffffff",
    text_primary: "#111827",
    text_secondary: "#4b5563",
    text_tertiary: "#6b7280",
    text_muted: "#9ca3af",
    border_primary: "#e5e7eb",
    border_secondary: "#f3f4f6",
    border_hover: "#d1d5db",
};

const DIM_GRAY: BackgroundPreset = BackgroundPreset {
    bg_primary: "#f3f4f6",
    bg_secondary: "#e5e7eb",
    bg_tertiary: "#d1d5db",
    bg_card: "#f9fafb",
    text_primary: "#111827",
    text_secondary: "#374151",
    text_tertiary: "#4b5563",
    text_muted: "#6b7280",
    border_primary: "#d1d5db",
    border_secondary: "#e5e7eb",
    border_hover: "#9ca3af",
};

const WARM_BEIGE: BackgroundPreset = BackgroundPreset {
    bg_primary: "#fdf8f3",
    bg_secondary: "#f7efe5",
    bg_tertiary: "#efe3d3",
    bg_card: "#fffbf7",
    text_primary: "#292524",
    text_secondary: "#57534e",
    text_tertiary: "#78716c",
    text_muted: "#a8a29e",
    border_primary: "#e7dccd",
    border_secondary: "#f0e7dc",
    border_hover: "#d6c7b4",
};

const DARK_MODE: BackgroundPreset = BackgroundPreset {
    bg_primary: "#0f172a",
    bg_secondary: "#1e293b",
    bg_tertiary: "#334155",
    bg_card: "#1e293b",
    text_primary: "#f8fafc",
    text_secondary: "#cbd5e1",
    text_tertiary: "#94a3b8",
    text_muted: "#64748b",
    border_primary: "#334155",
    border_secondary: "#1e293b",
    border_hover: "#475569",
};

const SHARP: RoundnessPreset = RoundnessPreset {
    sm: "0rem",
    md: "0rem",
    lg: "0rem",
    xl: "0rem",
    full: "9999px",
    button: "0rem",
    card: "0rem",
};

const ROUNDED: RoundnessPreset = RoundnessPreset {
    sm: "0.25rem",
    md: "0.5rem",
    lg: "0.75rem",
    xl: "1rem",
    full: "9999px",
    button: "0.5rem",
    card: "0.75rem",
};

const FULL: RoundnessPreset = RoundnessPreset {
    sm: "0.5rem",
    md: "1rem",
    lg: "1.5rem",
    xl: "2rem",
    full: "9999px",
    button: "9999px",
    card: "1.5rem",
};

impl BackgroundStyle {
    /// Color bundle for this background style
    pub fn preset(self) -> &'static BackgroundPreset {
        match self {
            Self::CleanWhite => &CLEAN_WHITE,
            Self::DimGray => &DIM_GRAY,
            Self::WarmBeige => &WARM_BEIGE,
            Self::DarkMode => &DARK_MODE,
        }
    }
}

impl Roundness {
    /// Radius bundle for this roundness level
    pub fn preset(self) -> &'static RoundnessPreset {
        match self {
            Self::Sharp => &SHARP,
            Self::Rounded => &ROUNDED,
            Self::Full => &FULL,
        }
    }
}
