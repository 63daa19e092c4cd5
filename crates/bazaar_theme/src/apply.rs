//! Applying tokens to the document
//!
//! [`apply_theme`] is the only place theme tokens reach the document. Every
//! call writes the full key set, so the last application always wins.

use crate::document::StyleTarget;
use crate::tokens::{ThemeToken, ThemeTokens};

/// Write every token onto the document root as a custom property
pub fn apply_theme<D: StyleTarget + ?Sized>(document: &D, tokens: &ThemeTokens) {
    for (token, value) in tokens.iter() {
        document.set_property(token.css_name(), value);
    }
    tracing::debug!(count = ThemeToken::COUNT, "applied theme tokens");
}

/// Read the token set currently live on the document.
///
/// Returns `None` unless every key has been applied.
pub fn read_applied_tokens<D: StyleTarget + ?Sized>(document: &D) -> Option<ThemeTokens> {
    ThemeTokens::try_from_fn(|token| document.property(token.css_name()))
}
