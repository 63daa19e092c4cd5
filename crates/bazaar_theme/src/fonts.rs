//! Font selection
//!
//! Heading and body fonts are chosen from static catalogs and persisted
//! separately from the color theme (keys [`FONT_HEADING_KEY`] and
//! [`FONT_BODY_KEY`]), so reading the full "current theme" means consulting
//! both this module and [`crate::store`].

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::document::StyleTarget;
use crate::storage::LocalStorage;

pub const FONT_HEADING_KEY: &str = "font-heading";
pub const FONT_BODY_KEY: &str = "font-body";

/// Custom property carrying the heading font stack
pub const HEADING_FONT_VAR: &str = "--heading-font";
/// Custom property carrying the body font stack
pub const BODY_FONT_VAR: &str = "--body-font";

/// Id of the injected web-font stylesheet link
pub const FONT_LINK_ID: &str = "dynamic-fonts";

const FONTS_CSS_URL: &str = "https://fonts.googleapis.com/css2";
const HEADING_WEIGHTS: &[u16] = &[400, 600, 700];
const BODY_WEIGHTS: &[u16] = &[400, 500, 600];

pub const DEFAULT_HEADING_FONT: &str = "Poppins";
pub const DEFAULT_BODY_FONT: &str = "Inter";

/// Font classification, which decides the generic fallback family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontCategory {
    Serif,
    SansSerif,
    Display,
    Monospace,
}

impl FontCategory {
    /// Generic CSS family used after the named family
    pub fn generic_family(self) -> &'static str {
        match self {
            Self::Serif => "serif",
            Self::Monospace => "monospace",
            Self::SansSerif | Self::Display => "sans-serif",
        }
    }
}

/// A selectable font
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontOption {
    pub name: &'static str,
    pub family: &'static str,
    pub category: FontCategory,
    pub is_web_font: bool,
}

const fn font(
    name: &'static str,
    family: &'static str,
    category: FontCategory,
    is_web_font: bool,
) -> FontOption {
    FontOption {
        name,
        family,
        category,
        is_web_font,
    }
}

pub const HEADING_FONTS: &[FontOption] = &[
    font("Poppins", "Poppins", FontCategory::SansSerif, true),
    font("Montserrat", "Montserrat", FontCategory::SansSerif, true),
    font("Raleway", "Raleway", FontCategory::SansSerif, true),
    font("Playfair Display", "Playfair Display", FontCategory::Serif, true),
    font("Merriweather", "Merriweather", FontCategory::Serif, true),
    font("Lora", "Lora", FontCategory::Serif, true),
    font("Amiri", "Amiri", FontCategory::Serif, true),
    font("Bebas Neue", "Bebas Neue", FontCategory::Display, true),
    font("Georgia", "Georgia", FontCategory::Serif, false),
    font("Helvetica", "Helvetica", FontCategory::SansSerif, false),
];

pub const BODY_FONTS: &[FontOption] = &[
    font("Inter", "Inter", FontCategory::SansSerif, true),
    font("Open Sans", "Open Sans", FontCategory::SansSerif, true),
    font("Roboto", "Roboto", FontCategory::SansSerif, true),
    font("Lato", "Lato", FontCategory::SansSerif, true),
    font("Source Serif", "Source Serif 4", FontCategory::Serif, true),
    font("Noto Naskh Arabic", "Noto Naskh Arabic", FontCategory::Serif, true),
    font("JetBrains Mono", "JetBrains Mono", FontCategory::Monospace, true),
    font("Arial", "Arial", FontCategory::SansSerif, false),
    font("Georgia", "Georgia", FontCategory::Serif, false),
];

/// Look a font up by family (or display name) in either catalog
pub fn find_font(family: &str) -> Option<&'static FontOption> {
    HEADING_FONTS
        .iter()
        .chain(BODY_FONTS.iter())
        .find(|f| f.family.eq_ignore_ascii_case(family) || f.name.eq_ignore_ascii_case(family))
}

/// `'Family', generic` for a family name; unknown families fall back to sans-serif
pub fn font_stack(family: &str) -> String {
    let (family, generic) = match find_font(family) {
        Some(f) => (f.family, f.category.generic_family()),
        None => (family, FontCategory::SansSerif.generic_family()),
    };
    format!("'{family}', {generic}")
}

/// Build a single web-font stylesheet URL for both families.
///
/// Only catalog web fonts are requested; returns an empty string when
/// neither family needs loading.
pub fn generate_font_stylesheet_url(heading: &str, body: &str) -> String {
    let mut families: Vec<(&'static str, BTreeSet<u16>)> = Vec::new();
    for (name, weights) in [(heading, HEADING_WEIGHTS), (body, BODY_WEIGHTS)] {
        let Some(option) = find_font(name).filter(|f| f.is_web_font) else {
            continue;
        };
        match families.iter_mut().find(|(family, _)| *family == option.family) {
            Some((_, existing)) => existing.extend(weights.iter().copied()),
            None => families.push((option.family, weights.iter().copied().collect())),
        }
    }

    if families.is_empty() {
        return String::new();
    }

    let query: Vec<String> = families
        .iter()
        .map(|(family, weights)| {
            let weights: Vec<String> = weights.iter().map(u16::to_string).collect();
            format!("family={}:wght@{}", family.replace(' ', "+"), weights.join(";"))
        })
        .collect();
    format!("{FONTS_CSS_URL}?{}&display=swap", query.join("&"))
}

/// Set the font variables and swap in the matching web-font stylesheet.
///
/// At most one injected font link exists at a time.
pub fn apply_fonts<D: StyleTarget + ?Sized>(document: &D, heading: &str, body: &str) {
    document.set_property(HEADING_FONT_VAR, &font_stack(heading));
    document.set_property(BODY_FONT_VAR, &font_stack(body));

    let url = generate_font_stylesheet_url(heading, body);
    if !url.is_empty() {
        document.remove_element(FONT_LINK_ID);
        document.set_link(FONT_LINK_ID, &url);
    }
    debug!(heading, body, "applied fonts");
}

/// The chosen heading and body families
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontConfig {
    pub heading: String,
    pub body: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            heading: DEFAULT_HEADING_FONT.to_string(),
            body: DEFAULT_BODY_FONT.to_string(),
        }
    }
}

/// Persist the font choice; failures are logged and ignored
pub fn save_font_config<S: LocalStorage + ?Sized>(storage: &S, config: &FontConfig) {
    for (key, value) in [(FONT_HEADING_KEY, &config.heading), (FONT_BODY_KEY, &config.body)] {
        if let Err(e) = storage.set_item(key, value) {
            warn!(key, error = %e, "failed to persist font choice");
        }
    }
}

/// Load the saved font choice.
///
/// `None` when nothing was saved; a missing half falls back to the default.
pub fn load_font_config<S: LocalStorage + ?Sized>(storage: &S) -> Option<FontConfig> {
    let read = |key: &str| match storage.get_item(key) {
        Ok(value) => value.filter(|v| !v.trim().is_empty()),
        Err(e) => {
            warn!(key, error = %e, "failed to read font choice");
            None
        }
    };
    let (heading, body) = (read(FONT_HEADING_KEY), read(FONT_BODY_KEY));
    if heading.is_none() && body.is_none() {
        return None;
    }
    let defaults = FontConfig::default();
    Some(FontConfig {
        heading: heading.unwrap_or(defaults.heading),
        body: body.unwrap_or(defaults.body),
    })
}

/// Apply the saved font choice, if any. Returns whether fonts were applied.
pub fn initialize_fonts<S, D>(storage: &S, document: &D) -> bool
where
    S: LocalStorage + ?Sized,
    D: StyleTarget + ?Sized,
{
    match load_font_config(storage) {
        Some(config) => {
            apply_fonts(document, &config.heading, &config.body);
            true
        }
        None => {
            debug!("no saved fonts; keeping document defaults");
            false
        }
    }
}
