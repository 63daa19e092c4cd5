//! Design token schema
//!
//! [`ThemeTokens`] is a closed, fixed-shape set of CSS custom properties.
//! Every key always carries a value: the struct has one `String` field per
//! token, so a token set can't be built with a hole in it, and the serialized
//! form is a flat JSON object keyed by CSS variable name.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Token groups, used for display and diagnostics
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum TokenGroup {
    Background,
    Text,
    Primary,
    Accent,
    Status,
    Border,
    Radius,
    Spacing,
    Shadow,
    Button,
}

impl TokenGroup {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Background => "Backgrounds",
            Self::Text => "Text",
            Self::Primary => "Primary",
            Self::Accent => "Accent",
            Self::Status => "Status",
            Self::Border => "Borders",
            Self::Radius => "Radii",
            Self::Spacing => "Spacing",
            Self::Shadow => "Shadows",
            Self::Button => "Buttons",
        }
    }
}

macro_rules! token_schema {
    ($( $group:ident { $( $variant:ident => $field:ident : $css:literal ),* $(,)? } )*) => {
        /// Token keys for dynamic access
        #[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
        pub enum ThemeToken {
            $($($variant,)*)*
        }

        impl ThemeToken {
            /// Every token, in schema order
            pub const ALL: &'static [ThemeToken] = &[$($(ThemeToken::$variant,)*)*];

            /// CSS custom property name, including the leading `--`
            pub fn css_name(self) -> &'static str {
                match self {
                    $($(ThemeToken::$variant => $css,)*)*
                }
            }

            pub fn group(self) -> TokenGroup {
                match self {
                    $($(ThemeToken::$variant => TokenGroup::$group,)*)*
                }
            }
        }

        /// Complete set of theme tokens
        #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
        pub struct ThemeTokens {
            $($(
                #[serde(rename = $css)]
                pub $field: String,
            )*)*
        }

        impl ThemeTokens {
            /// Get a token value by key
            pub fn get(&self, token: ThemeToken) -> &str {
                match token {
                    $($(ThemeToken::$variant => &self.$field,)*)*
                }
            }

            /// Replace a single token value
            pub fn set(&mut self, token: ThemeToken, value: impl Into<String>) {
                let slot = match token {
                    $($(ThemeToken::$variant => &mut self.$field,)*)*
                };
                *slot = value.into();
            }

            /// Build a token set from a per-key lookup.
            ///
            /// Returns `None` as soon as any key is missing.
            pub fn try_from_fn(mut lookup: impl FnMut(ThemeToken) -> Option<String>) -> Option<Self> {
                Some(Self {
                    $($($field: lookup(ThemeToken::$variant)?,)*)*
                })
            }
        }
    };
}

token_schema! {
    Background {
        BgPrimary => bg_primary: "--bg-primary",
        BgSecondary => bg_secondary: "--bg-secondary",
        BgTertiary => bg_tertiary: "--bg-tertiary",
        BgCard => bg_card: "--bg-card",
        BgOverlay => bg_overlay: "--bg-overlay",
        BgHover => bg_hover: "--bg-hover",
        BgActive => bg_active: "--bg-active",
    }
    Text {
        TextPrimary => text_primary: "--text-primary",
        TextSecondary => text_secondary: "--text-secondary",
        TextTertiary => text_tertiary: "--text-tertiary",
        TextMuted => text_muted: "--text-muted",
        TextInverse => text_inverse: "--text-inverse",
    }
    Primary {
        Primary => primary: "--color-primary",
        PrimaryHover => primary_hover: "--color-primary-hover",
        PrimaryLight => primary_light: "--color-primary-light",
        PrimaryDark => primary_dark: "--color-primary-dark",
        PrimaryAlpha10 => primary_alpha_10: "--color-primary-alpha-10",
        PrimaryAlpha20 => primary_alpha_20: "--color-primary-alpha-20",
    }
    Accent {
        Accent => accent: "--color-accent",
        AccentHover => accent_hover: "--color-accent-hover",
        AccentLight => accent_light: "--color-accent-light",
    }
    Status {
        Success => success: "--color-success",
        SuccessLight => success_light: "--color-success-light",
        Warning => warning: "--color-warning",
        WarningLight => warning_light: "--color-warning-light",
        Error => error: "--color-error",
        ErrorLight => error_light: "--color-error-light",
        Info => info: "--color-info",
        InfoLight => info_light: "--color-info-light",
    }
    Border {
        BorderPrimary => border_primary: "--border-primary",
        BorderSecondary => border_secondary: "--border-secondary",
        BorderHover => border_hover: "--border-hover",
        BorderFocus => border_focus: "--border-focus",
    }
    Radius {
        RadiusSm => radius_sm: "--radius-sm",
        RadiusMd => radius_md: "--radius-md",
        RadiusLg => radius_lg: "--radius-lg",
        RadiusXl => radius_xl: "--radius-xl",
        RadiusFull => radius_full: "--radius-full",
        RadiusButton => radius_button: "--radius-button",
        RadiusCard => radius_card: "--radius-card",
    }
    Spacing {
        SpacingXs => spacing_xs: "--spacing-xs",
        SpacingSm => spacing_sm: "--spacing-sm",
        SpacingMd => spacing_md: "--spacing-md",
        SpacingLg => spacing_lg: "--spacing-lg",
        SpacingXl => spacing_xl: "--spacing-xl",
    }
    Shadow {
        ShadowSm => shadow_sm: "--shadow-sm",
        ShadowMd => shadow_md: "--shadow-md",
        ShadowLg => shadow_lg: "--shadow-lg",
        ShadowXl => shadow_xl: "--shadow-xl",
    }
    Button {
        BtnPrimaryBg => btn_primary_bg: "--btn-primary-bg",
        BtnPrimaryText => btn_primary_text: "--btn-primary-text",
        BtnPrimaryHover => btn_primary_hover: "--btn-primary-hover",
        BtnSecondaryBg => btn_secondary_bg: "--btn-secondary-bg",
        BtnSecondaryText => btn_secondary_text: "--btn-secondary-text",
        BtnSecondaryHover => btn_secondary_hover: "--btn-secondary-hover",
    }
}

impl ThemeToken {
    /// Number of keys in the schema
    pub const COUNT: usize = Self::ALL.len();
}

impl Display for ThemeToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.css_name())
    }
}

impl FromStr for ThemeToken {
    type Err = String;

    /// Parses the CSS name, with or without the leading `--`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches("--");
        Self::ALL
            .iter()
            .copied()
            .find(|t| &t.css_name()[2..] == name)
            .ok_or_else(|| format!("unknown theme token `{s}`"))
    }
}

impl ThemeTokens {
    /// Iterate `(token, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (ThemeToken, &str)> + '_ {
        ThemeToken::ALL.iter().map(move |&t| (t, self.get(t)))
    }

    /// Render as the body of a `:root { ... }` block, one comment per group
    pub fn to_css_declarations(&self) -> String {
        let mut out = String::with_capacity(ThemeToken::COUNT * 40);
        let mut group = None;
        for (token, value) in self.iter() {
            if group != Some(token.group()) {
                if group.is_some() {
                    out.push('\n');
                }
                out.push_str("  /* ");
                out.push_str(token.group().display_name());
                out.push_str(" */\n");
                group = Some(token.group());
            }
            out.push_str("  ");
            out.push_str(token.css_name());
            out.push_str(": ");
            out.push_str(value);
            out.push_str(";\n");
        }
        out
    }
}

impl Default for ThemeTokens {
    /// The compiled-in default token set, generated from the default config
    fn default() -> Self {
        crate::generator::generate_theme(&crate::theme::SimpleThemeConfig::default())
    }
}
