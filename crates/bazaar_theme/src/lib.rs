//! Bazaar Theme Engine
//!
//! Dynamic theming for the Bazaar product directory: a handful of
//! user-facing choices become a full set of CSS design tokens, which are
//! applied to the document root and persisted locally or published for all
//! users.
//!
//! # Overview
//!
//! - **Color math** ([`color`]): hex lighten/darken/mix/alpha and contrast
//! - **Token schema** ([`ThemeTokens`]): the closed set of CSS custom properties
//! - **Presets** ([`presets`]): background and roundness tables
//! - **Generation** ([`generate_theme`]): config in, full token set out
//! - **Fonts** ([`fonts`]): heading/body catalogs and web-font loading
//! - **Persistence** ([`ThemeStore`]): local and global tiers, export/import
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bazaar_theme::{
//!     BackgroundStyle, MemoryRemote, MemoryStorage, RootStyle, SimpleThemeConfig, ThemeStore,
//! };
//!
//! let store = ThemeStore::new(MemoryStorage::new(), MemoryRemote::new(), RootStyle::new());
//!
//! // At startup: global theme, then the local one, then defaults
//! pollster::block_on(store.initialize_theme_from_database());
//!
//! // Apply a personal theme
//! let config = SimpleThemeConfig::new("#10B981").with_background(BackgroundStyle::DarkMode);
//! store.update_theme(&config);
//!
//! println!("{}", store.document().to_css());
//! ```
//!
//! # Startup precedence
//!
//! 1. The published global theme (`app_settings/global_theme`), if present
//! 2. The local config and tokens, if both are present
//! 3. [`ThemeTokens::default`]
//!
//! Font choices live in their own storage keys and are initialized
//! separately with [`fonts::initialize_fonts`].

pub mod apply;
pub mod color;
pub mod document;
pub mod error;
pub mod fonts;
pub mod generator;
pub mod presets;
pub mod remote;
pub mod storage;
pub mod store;
pub mod theme;
pub mod tokens;

// Re-export commonly used types
pub use apply::{apply_theme, read_applied_tokens};
pub use document::{RootStyle, StyleTarget};
pub use error::{Result, ThemeError};
pub use fonts::{FontCategory, FontConfig, FontOption};
pub use generator::generate_theme;
pub use presets::{BackgroundPreset, RoundnessPreset};
pub use remote::{DirectoryRemote, MemoryRemote, RemoteError, RemoteSettings};
pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError};
pub use store::{GlobalTheme, ThemeExport, ThemeSource, ThemeStore};
pub use theme::{BackgroundStyle, Roundness, SimpleThemeConfig};
pub use tokens::{ThemeToken, ThemeTokens, TokenGroup};
