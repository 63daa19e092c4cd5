//! Hex color arithmetic
//!
//! Colors travel through the engine as CSS hex strings (`#rrggbb` or the
//! 3-digit shorthand, case-insensitive). Every operation that produces a
//! color degrades gracefully: when an input can't be parsed, the original
//! string is handed back unchanged so that a bad brand color renders wrong
//! instead of failing theme application.
//!
//! `lighten` and `darken` scale each channel multiplicatively. This is not a
//! perceptual color model (no HSL or OKLCH round trip); it is a known
//! approximation that keeps the math trivial and fast.

use thiserror::Error;

/// Errors produced while parsing hex colors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// The input is not a 3- or 6-digit hex color
    #[error("invalid hex color: {0:?}")]
    InvalidFormat(String),
}

/// An 8-bit RGB triple
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Relative luminance in `[0, 1]` using the Rec. 601 luma weights
    pub fn luminance(&self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }

    fn scale(&self, factor: f64) -> String {
        rgb_to_hex(
            self.r as f64 * factor,
            self.g as f64 * factor,
            self.b as f64 * factor,
        )
    }
}

/// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb` into an [`Rgb`]
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ColorError> {
    let invalid = || ColorError::InvalidFormat(hex.to_string());

    let digits = hex.trim().trim_start_matches('#');
    let normalized: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };

    if normalized.len() != 6 || !normalized.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&normalized[i..i + 2], 16).map_err(|_| invalid());
    Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Format channels as `#rrggbb`, rounding and clamping each to a byte
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    fn byte(v: f64) -> u8 {
        v.round().clamp(0.0, 255.0) as u8
    }
    format!("#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b))
}

/// Scale every channel up by `percent`, saturating at 255
pub fn lighten(hex: &str, percent: f64) -> String {
    match hex_to_rgb(hex) {
        Ok(rgb) => rgb.scale(1.0 + percent / 100.0),
        Err(_) => hex.to_string(),
    }
}

/// Scale every channel down by `percent`, saturating at 0
pub fn darken(hex: &str, percent: f64) -> String {
    match hex_to_rgb(hex) {
        Ok(rgb) => rgb.scale(1.0 - percent / 100.0),
        Err(_) => hex.to_string(),
    }
}

/// Render the color as `rgba(r, g, b, alpha)`.
///
/// `alpha` is expected in `[0, 1]` and written as given.
pub fn with_alpha(hex: &str, alpha: f64) -> String {
    match hex_to_rgb(hex) {
        Ok(Rgb { r, g, b }) => format!("rgba({r}, {g}, {b}, {alpha})"),
        Err(_) => hex.to_string(),
    }
}

/// Per-channel linear interpolation: `a * (1 - weight) + b * weight`.
///
/// Returns `a` unchanged when either color fails to parse.
pub fn mix_colors(a: &str, b: &str, weight: f64) -> String {
    match (hex_to_rgb(a), hex_to_rgb(b)) {
        (Ok(from), Ok(to)) => {
            let lerp = |x: u8, y: u8| x as f64 * (1.0 - weight) + y as f64 * weight;
            rgb_to_hex(lerp(from.r, to.r), lerp(from.g, to.g), lerp(from.b, to.b))
        }
        _ => a.to_string(),
    }
}

/// Even blend of two colors
pub fn mix(a: &str, b: &str) -> String {
    mix_colors(a, b, 0.5)
}

/// Whether the color reads as light (luminance above one half).
///
/// Unparsable input counts as light.
pub fn is_light(hex: &str) -> bool {
    hex_to_rgb(hex).map_or(true, |rgb| rgb.luminance() > 0.5)
}

/// Black or white text, whichever stays legible on `background`
pub fn get_contrast_text(background: &str) -> &'static str {
    if is_light(background) {
        "#000000"
    } else {
        "#ffffff"
    }
}
