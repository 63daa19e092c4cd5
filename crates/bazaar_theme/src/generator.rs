//! Theme generation
//!
//! Maps a [`SimpleThemeConfig`] onto a complete [`ThemeTokens`] set. The
//! function is pure: the same config always yields the same tokens, and no
//! state outside the compiled-in presets is consulted.

use crate::color::{darken, get_contrast_text, lighten, mix_colors, with_alpha};
use crate::presets::{BackgroundPreset, RoundnessPreset};
use crate::theme::SimpleThemeConfig;
use crate::tokens::ThemeTokens;

/// Status hue with the pastel used on light backgrounds
struct StatusColor {
    hue: &'static str,
    pastel: &'static str,
}

const SUCCESS: StatusColor = StatusColor {
    hue: "#22c55e",
    pastel: "#dcfce7",
};
const WARNING: StatusColor = StatusColor {
    hue: "#f59e0b",
    pastel: "#fef3c7",
};
const ERROR: StatusColor = StatusColor {
    hue: "#ef4444",
    pastel: "#fee2e2",
};
const INFO: StatusColor = StatusColor {
    hue: "#3b82f6",
    pastel: "#dbeafe",
};

impl StatusColor {
    fn light_variant(&self, dark: bool) -> String {
        if dark {
            darken(self.hue, 40.0)
        } else {
            self.pastel.to_string()
        }
    }
}

/// Elevation scale: (y offset px, blur px, spread px)
const ELEVATION: [(i32, i32, i32); 4] = [(1, 2, 0), (4, 6, -1), (10, 15, -3), (20, 25, -5)];
const SHADOW_ALPHA_LIGHT: [f64; 4] = [0.05, 0.1, 0.1, 0.1];
const SHADOW_ALPHA_DARK: [f64; 4] = [0.3, 0.4, 0.4, 0.5];

fn shadows(dark: bool) -> [String; 4] {
    let alphas = if dark {
        SHADOW_ALPHA_DARK
    } else {
        SHADOW_ALPHA_LIGHT
    };
    std::array::from_fn(|i| {
        let (y, blur, spread) = ELEVATION[i];
        format!(
            "0 {y}px {blur}px {spread}px {}",
            with_alpha("#000000", alphas[i])
        )
    })
}

/// Generate the full token set for a config.
///
/// Invalid hex colors never fail generation; the color helpers pass them
/// through unchanged so the result looks wrong rather than erroring.
pub fn generate_theme(config: &SimpleThemeConfig) -> ThemeTokens {
    let primary = config.primary_color.as_str();
    let accent = config
        .accent_color
        .clone()
        .unwrap_or_else(|| darken(primary, 15.0));

    let bg: &BackgroundPreset = config.background_color.preset();
    let radii: &RoundnessPreset = config.roundness.preset();
    let dark = config.background_color.is_dark();

    let primary_hover = darken(primary, 10.0);
    let [shadow_sm, shadow_md, shadow_lg, shadow_xl] = shadows(dark);

    tracing::trace!(
        primary,
        accent = %accent,
        background = %config.background_color,
        roundness = %config.roundness,
        "generating theme tokens"
    );

    ThemeTokens {
        bg_primary: bg.bg_primary.to_string(),
        bg_secondary: bg.bg_secondary.to_string(),
        bg_tertiary: bg.bg_tertiary.to_string(),
        bg_card: bg.bg_card.to_string(),
        bg_overlay: with_alpha("#000000", if dark { 0.7 } else { 0.5 }),
        bg_hover: mix_colors(bg.bg_primary, bg.bg_tertiary, 0.3),
        bg_active: mix_colors(bg.bg_primary, bg.bg_tertiary, 0.6),

        text_primary: bg.text_primary.to_string(),
        text_secondary: bg.text_secondary.to_string(),
        text_tertiary: bg.text_tertiary.to_string(),
        text_muted: bg.text_muted.to_string(),
        text_inverse: bg.bg_primary.to_string(),

        primary: primary.to_string(),
        primary_hover: primary_hover.clone(),
        primary_light: lighten(primary, 40.0),
        primary_dark: darken(primary, 20.0),
        primary_alpha_10: with_alpha(primary, 0.1),
        primary_alpha_20: with_alpha(primary, 0.2),

        accent_hover: darken(&accent, 10.0),
        accent_light: lighten(&accent, 40.0),
        accent,

        success: SUCCESS.hue.to_string(),
        success_light: SUCCESS.light_variant(dark),
        warning: WARNING.hue.to_string(),
        warning_light: WARNING.light_variant(dark),
        error: ERROR.hue.to_string(),
        error_light: ERROR.light_variant(dark),
        info: INFO.hue.to_string(),
        info_light: INFO.light_variant(dark),

        border_primary: bg.border_primary.to_string(),
        border_secondary: bg.border_secondary.to_string(),
        border_hover: bg.border_hover.to_string(),
        border_focus: primary.to_string(),

        radius_sm: radii.sm.to_string(),
        radius_md: radii.md.to_string(),
        radius_lg: radii.lg.to_string(),
        radius_xl: radii.xl.to_string(),
        radius_full: radii.full.to_string(),
        radius_button: radii.button.to_string(),
        radius_card: radii.card.to_string(),

        spacing_xs: "0.25rem".to_string(),
        spacing_sm: "0.5rem".to_string(),
        spacing_md: "1rem".to_string(),
        spacing_lg: "1.5rem".to_string(),
        spacing_xl: "2rem".to_string(),

        shadow_sm,
        shadow_md,
        shadow_lg,
        shadow_xl,

        btn_primary_bg: primary.to_string(),
        btn_primary_text: get_contrast_text(primary).to_string(),
        btn_primary_hover: primary_hover,
        btn_secondary_bg: bg.bg_tertiary.to_string(),
        btn_secondary_text: bg.text_primary.to_string(),
        btn_secondary_hover: mix_colors(bg.bg_tertiary, bg.border_hover, 0.5),
    }
}
