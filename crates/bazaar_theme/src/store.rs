//! Theme persistence and startup resolution
//!
//! Two tiers hold a theme:
//! - **local**: this device's personal theme, under [`THEME_CONFIG_KEY`] and
//!   [`THEME_TOKENS_KEY`] in [`LocalStorage`]
//! - **global**: the theme an administrator published for everyone, a single
//!   row ([`GLOBAL_THEME_ID`]) in the [`SETTINGS_TABLE`] of [`RemoteSettings`]
//!
//! At startup the global theme wins over the local one, and the compiled-in
//! defaults are used when neither exists. There is currently no way for a
//! user to opt out of a published global theme.
//!
//! None of the operations here fail the caller. Storage problems are logged
//! and skipped, and remote failures become `false` / `None`, so theming
//! degrades to defaults instead of blocking the page.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::apply::{apply_theme, read_applied_tokens};
use crate::document::StyleTarget;
use crate::error::{Result, ThemeError};
use crate::generator::generate_theme;
use crate::remote::RemoteSettings;
use crate::storage::LocalStorage;
use crate::theme::SimpleThemeConfig;
use crate::tokens::ThemeTokens;

/// Local storage key for the personal theme config
pub const THEME_CONFIG_KEY: &str = "theme-config";
/// Local storage key for the personal theme tokens
pub const THEME_TOKENS_KEY: &str = "theme-tokens";
/// Remote table holding application settings
pub const SETTINGS_TABLE: &str = "app_settings";
/// Row id of the published global theme
pub const GLOBAL_THEME_ID: &str = "global_theme";
/// Interchange format version written by [`ThemeStore::export_theme`]
pub const EXPORT_VERSION: &str = "1.0";

/// The published global theme row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalTheme {
    pub id: String,
    pub config: SimpleThemeConfig,
    pub tokens: ThemeTokens,
    pub updated_at: DateTime<Utc>,
}

/// Export/import interchange document.
///
/// Either section may be missing on import.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeExport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SimpleThemeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<ThemeTokens>,
    /// Ignored on import when it isn't an RFC 3339 timestamp
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Which tier supplied the theme at startup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeSource {
    Global,
    Local,
    Default,
}

/// Theme persistence over local storage, the shared settings store, and the
/// document root
pub struct ThemeStore<L, R, D> {
    local: L,
    remote: R,
    document: D,
}

impl<L, R, D> ThemeStore<L, R, D>
where
    L: LocalStorage,
    R: RemoteSettings,
    D: StyleTarget,
{
    pub fn new(local: L, remote: R, document: D) -> Self {
        Self {
            local,
            remote,
            document,
        }
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    // ========== Local tier ==========

    pub fn save_theme_config(&self, config: &SimpleThemeConfig) {
        self.save_json(THEME_CONFIG_KEY, config);
    }

    pub fn save_theme_tokens(&self, tokens: &ThemeTokens) {
        self.save_json(THEME_TOKENS_KEY, tokens);
    }

    pub fn load_theme_config(&self) -> Option<SimpleThemeConfig> {
        self.load_json(THEME_CONFIG_KEY)
    }

    pub fn load_theme_tokens(&self) -> Option<ThemeTokens> {
        self.load_json(THEME_TOKENS_KEY)
    }

    fn save_json<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize theme data");
                return;
            }
        };
        if let Err(e) = self.local.set_item(key, &json) {
            warn!(key, error = %e, "failed to persist theme data locally");
        }
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.local.get_item(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key, error = %e, "failed to read theme data");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "ignoring corrupt theme data");
                None
            }
        }
    }

    fn remove_local(&self, key: &str) {
        if let Err(e) = self.local.remove_item(key) {
            warn!(key, error = %e, "failed to clear theme data");
        }
    }

    /// Generate, apply, and persist a personal theme
    pub fn update_theme(&self, config: &SimpleThemeConfig) -> ThemeTokens {
        let tokens = generate_theme(config);
        apply_theme(&self.document, &tokens);
        self.save_theme_config(config);
        self.save_theme_tokens(&tokens);
        tokens
    }

    /// Clear the personal theme and go back to the compiled-in defaults.
    ///
    /// The published global theme is left alone.
    pub fn reset_theme(&self) {
        self.remove_local(THEME_CONFIG_KEY);
        self.remove_local(THEME_TOKENS_KEY);
        apply_theme(&self.document, &ThemeTokens::default());
        info!("theme reset to defaults");
    }

    /// Tokens currently live on the document, if a full set has been applied
    pub fn current_tokens(&self) -> Option<ThemeTokens> {
        read_applied_tokens(&self.document)
    }

    // ========== Export / import ==========

    /// Serialize the personal theme as an interchange document
    pub fn export_theme(&self) -> Result<String> {
        let tokens = self
            .load_theme_tokens()
            .or_else(|| self.current_tokens())
            .unwrap_or_default();
        let export = ThemeExport {
            config: self.load_theme_config(),
            tokens: Some(tokens),
            exported_at: Some(Utc::now()),
            version: Some(EXPORT_VERSION.to_string()),
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Apply and persist an interchange document.
    ///
    /// Returns `false` without touching anything when the document can't be
    /// parsed or carries neither section.
    ///
    /// A tokens-only document keeps whatever config is already saved. With no
    /// saved config the tokens are applied and stored, but startup needs both
    /// halves, so the next [`initialize_theme_from_database`] falls back to
    /// the defaults.
    ///
    /// [`initialize_theme_from_database`]: Self::initialize_theme_from_database
    pub fn import_theme(&self, json: &str) -> bool {
        match self.try_import_theme(json) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "theme import failed");
                false
            }
        }
    }

    fn try_import_theme(&self, json: &str) -> Result<()> {
        let export: ThemeExport = serde_json::from_str(json)?;
        if let Some(version) = export.version.as_deref() {
            if version != EXPORT_VERSION {
                warn!(version, "importing theme document with unknown version");
            }
        }

        let tokens = match (&export.tokens, &export.config) {
            (Some(tokens), _) => tokens.clone(),
            (None, Some(config)) => generate_theme(config),
            (None, None) => return Err(ThemeError::EmptyImport),
        };

        apply_theme(&self.document, &tokens);
        match &export.config {
            Some(config) => self.save_theme_config(config),
            None if self.load_theme_config().is_none() => {
                warn!("imported tokens without a config; the theme won't survive a restart");
            }
            None => {}
        }
        self.save_theme_tokens(&tokens);
        info!(
            has_config = export.config.is_some(),
            has_tokens = export.tokens.is_some(),
            "theme imported"
        );
        Ok(())
    }

    // ========== Global tier ==========

    /// Publish a theme for every user and adopt it locally.
    ///
    /// On failure the local tier and the document are left untouched.
    pub async fn publish_theme_to_all_users(&self, config: &SimpleThemeConfig) -> bool {
        match self.try_publish(config).await {
            Ok(record) => {
                apply_theme(&self.document, &record.tokens);
                self.save_theme_config(&record.config);
                self.save_theme_tokens(&record.tokens);
                info!(updated_at = %record.updated_at, "published global theme");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to publish global theme");
                false
            }
        }
    }

    async fn try_publish(&self, config: &SimpleThemeConfig) -> Result<GlobalTheme> {
        let record = GlobalTheme {
            id: GLOBAL_THEME_ID.to_string(),
            config: config.clone(),
            tokens: generate_theme(config),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&record)?;
        self.remote
            .upsert(SETTINGS_TABLE, GLOBAL_THEME_ID, value)
            .await?;
        Ok(record)
    }

    /// Fetch the published global theme.
    ///
    /// A missing settings table is an expected cache miss during rollout;
    /// any other failure is logged. Both yield `None`.
    pub async fn load_global_theme(&self) -> Option<GlobalTheme> {
        let value = match self.remote.get(SETTINGS_TABLE, GLOBAL_THEME_ID).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("no global theme published");
                return None;
            }
            Err(e) if e.is_missing_table() => {
                debug!(table = SETTINGS_TABLE, "settings table not provisioned yet");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "failed to load global theme");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "ignoring malformed global theme row");
                None
            }
        }
    }

    /// Resolve and apply the startup theme: global, then local, then defaults
    pub async fn initialize_theme_from_database(&self) -> ThemeSource {
        if let Some(global) = self.load_global_theme().await {
            apply_theme(&self.document, &global.tokens);
            debug!(updated_at = %global.updated_at, "using global theme");
            return ThemeSource::Global;
        }

        if let (Some(_), Some(tokens)) = (self.load_theme_config(), self.load_theme_tokens()) {
            apply_theme(&self.document, &tokens);
            debug!("using local theme");
            return ThemeSource::Local;
        }

        apply_theme(&self.document, &ThemeTokens::default());
        debug!("using default theme");
        ThemeSource::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RootStyle;
    use crate::remote::{MemoryRemote, Outage};
    use crate::storage::MemoryStorage;
    use crate::theme::{BackgroundStyle, Roundness};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    type TestStore = ThemeStore<MemoryStorage, MemoryRemote, RootStyle>;

    fn store() -> TestStore {
        ThemeStore::new(
            MemoryStorage::new(),
            MemoryRemote::with_table(SETTINGS_TABLE),
            RootStyle::new(),
        )
    }

    fn violet() -> SimpleThemeConfig {
        SimpleThemeConfig::new("#7c3aed").with_roundness(Roundness::Full)
    }

    #[test]
    fn load_returns_none_when_absent_or_corrupt() {
        let store = store();
        assert!(store.load_theme_config().is_none());
        store.local().set_item(THEME_CONFIG_KEY, "{not json").unwrap();
        assert!(store.load_theme_config().is_none());
        store.local().set_item(THEME_TOKENS_KEY, r##"{"--bg-primary":"#fff"}"##).unwrap();
        assert!(store.load_theme_tokens().is_none());
    }

    #[test]
    fn update_applies_and_persists() {
        let store = store();
        let tokens = store.update_theme(&violet());
        assert_eq!(store.current_tokens(), Some(tokens.clone()));
        assert_eq!(store.load_theme_config(), Some(violet()));
        assert_eq!(store.load_theme_tokens(), Some(tokens));
    }

    #[test]
    fn update_still_applies_when_storage_is_full() {
        let store = ThemeStore::new(
            MemoryStorage::with_quota(64),
            MemoryRemote::new(),
            RootStyle::new(),
        );
        let tokens = store.update_theme(&violet());
        assert_eq!(store.current_tokens(), Some(tokens));
        assert!(store.load_theme_tokens().is_none());
    }

    #[test]
    fn reset_clears_local_and_applies_defaults() {
        let store = store();
        store.update_theme(&violet());
        store.reset_theme();
        assert!(store.local().get_item(THEME_CONFIG_KEY).unwrap().is_none());
        assert!(store.local().get_item(THEME_TOKENS_KEY).unwrap().is_none());
        assert_eq!(store.current_tokens(), Some(ThemeTokens::default()));
    }

    #[test]
    fn reset_leaves_global_row_alone() {
        let store = store();
        assert!(pollster::block_on(store.publish_theme_to_all_users(&violet())));
        let before = store.remote().record(SETTINGS_TABLE, GLOBAL_THEME_ID);
        store.reset_theme();
        assert_eq!(store.remote().record(SETTINGS_TABLE, GLOBAL_THEME_ID), before);
        assert!(before.is_some());
    }

    #[test]
    fn export_then_import_restores_the_theme() {
        let store = store();
        let tokens = store.update_theme(&violet());
        let exported = store.export_theme().unwrap();

        store.reset_theme();
        assert_ne!(store.current_tokens(), Some(tokens.clone()));

        assert!(store.import_theme(&exported));
        assert_eq!(store.current_tokens(), Some(tokens.clone()));
        assert_eq!(store.load_theme_config(), Some(violet()));
        assert_eq!(store.load_theme_tokens(), Some(tokens));
    }

    #[test]
    fn export_document_shape() {
        let store = store();
        store.update_theme(&violet());
        let value: serde_json::Value = serde_json::from_str(&store.export_theme().unwrap()).unwrap();
        assert_eq!(value["version"], "1.0");
        assert!(value["exportedAt"].is_string());
        assert_eq!(value["config"]["primaryColor"], "#7c3aed");
        assert_eq!(value["tokens"]["--radius-button"], "9999px");
    }

    #[test]
    fn import_config_only_regenerates_tokens() {
        let store = store();
        let doc = json!({ "config": violet() }).to_string();
        assert!(store.import_theme(&doc));
        assert_eq!(store.current_tokens(), Some(generate_theme(&violet())));
        assert_eq!(store.load_theme_config(), Some(violet()));
    }

    #[test]
    fn import_tokens_only_keeps_existing_config() {
        let store = store();
        store.update_theme(&violet());
        let dark = generate_theme(&SimpleThemeConfig::default().with_background(BackgroundStyle::DarkMode));
        let doc = json!({ "tokens": dark }).to_string();
        assert!(store.import_theme(&doc));
        assert_eq!(store.current_tokens(), Some(dark.clone()));
        assert_eq!(store.load_theme_tokens(), Some(dark));
        assert_eq!(store.load_theme_config(), Some(violet()));
    }

    #[test]
    fn tokens_only_import_without_saved_config_is_session_only() {
        let store = store();
        let dark = generate_theme(&SimpleThemeConfig::default().with_background(BackgroundStyle::DarkMode));
        assert!(store.import_theme(&json!({ "tokens": dark }).to_string()));
        assert_eq!(store.current_tokens(), Some(dark.clone()));
        assert_eq!(store.load_theme_tokens(), Some(dark));
        assert!(store.load_theme_config().is_none());

        let fresh = ThemeStore::new(store.local(), store.remote(), RootStyle::new());
        assert_eq!(
            pollster::block_on(fresh.initialize_theme_from_database()),
            ThemeSource::Default
        );
    }

    #[test]
    fn import_tolerates_a_foreign_timestamp() {
        let store = store();
        for exported_at in [json!(1700000000), json!("yesterday"), json!(null)] {
            let doc = json!({ "config": violet(), "exportedAt": exported_at, "version": "1.0" });
            assert!(store.import_theme(&doc.to_string()), "exportedAt={exported_at}");
        }
        assert_eq!(store.load_theme_config(), Some(violet()));

        let export: ThemeExport = serde_json::from_str(&store.export_theme().unwrap()).unwrap();
        assert!(export.exported_at.is_some());
    }

    #[test]
    fn invalid_import_changes_nothing() {
        let store = store();
        let tokens = store.update_theme(&violet());
        for doc in [
            "not json",
            "{}",
            r#"{"version":"1.0"}"#,
            r##"{"tokens":{"--bg-primary":"#000000"}}"##,
        ] {
            assert!(!store.import_theme(doc), "{doc}");
        }
        assert_eq!(store.current_tokens(), Some(tokens.clone()));
        assert_eq!(store.load_theme_tokens(), Some(tokens));
    }

    #[test]
    fn publish_writes_singleton_row_and_adopts_locally() {
        let store = store();
        assert!(pollster::block_on(store.publish_theme_to_all_users(&violet())));

        let row = store.remote().record(SETTINGS_TABLE, GLOBAL_THEME_ID).unwrap();
        assert_eq!(row["id"], GLOBAL_THEME_ID);
        assert_eq!(row["config"]["primaryColor"], "#7c3aed");
        assert!(row["updated_at"].is_string());
        assert_eq!(store.load_theme_config(), Some(violet()));
        assert_eq!(store.current_tokens(), Some(generate_theme(&violet())));
    }

    #[test]
    fn republish_overwrites() {
        let store = store();
        assert!(pollster::block_on(store.publish_theme_to_all_users(&violet())));
        let teal = SimpleThemeConfig::new("#0d9488");
        assert!(pollster::block_on(store.publish_theme_to_all_users(&teal)));
        let global = pollster::block_on(store.load_global_theme()).unwrap();
        assert_eq!(global.config, teal);
    }

    #[test]
    fn failed_publish_leaves_local_state_untouched() {
        let store = store();
        store.update_theme(&violet());
        let config_before = store.local().get_item(THEME_CONFIG_KEY).unwrap();
        let tokens_before = store.local().get_item(THEME_TOKENS_KEY).unwrap();
        let applied_before = store.current_tokens();

        store.remote().set_outage(Some(Outage::PermissionDenied));
        let teal = SimpleThemeConfig::new("#0d9488");
        assert!(!pollster::block_on(store.publish_theme_to_all_users(&teal)));

        assert_eq!(store.local().get_item(THEME_CONFIG_KEY).unwrap(), config_before);
        assert_eq!(store.local().get_item(THEME_TOKENS_KEY).unwrap(), tokens_before);
        assert_eq!(store.current_tokens(), applied_before);
    }

    #[test]
    fn publish_fails_without_settings_table() {
        let store = ThemeStore::new(MemoryStorage::new(), MemoryRemote::new(), RootStyle::new());
        assert!(!pollster::block_on(store.publish_theme_to_all_users(&violet())));
        assert!(store.load_theme_config().is_none());
    }

    #[test]
    fn global_load_misses_are_soft() {
        let unprovisioned = ThemeStore::new(MemoryStorage::new(), MemoryRemote::new(), RootStyle::new());
        assert!(pollster::block_on(unprovisioned.load_global_theme()).is_none());

        let store = store();
        assert!(pollster::block_on(store.load_global_theme()).is_none());

        pollster::block_on(store.remote().upsert(
            SETTINGS_TABLE,
            GLOBAL_THEME_ID,
            json!({"id": GLOBAL_THEME_ID, "config": {}}),
        ))
        .unwrap();
        assert!(pollster::block_on(store.load_global_theme()).is_none());
    }

    #[test]
    fn startup_prefers_global_over_local() {
        let store = store();
        assert!(pollster::block_on(store.publish_theme_to_all_users(&violet())));
        let local = SimpleThemeConfig::new("#dc2626").with_background(BackgroundStyle::WarmBeige);
        store.update_theme(&local);

        let fresh = ThemeStore::new(store.local(), store.remote(), RootStyle::new());
        let source = pollster::block_on(fresh.initialize_theme_from_database());
        assert_eq!(source, ThemeSource::Global);
        assert_eq!(fresh.current_tokens(), Some(generate_theme(&violet())));
    }

    #[test]
    fn startup_falls_back_to_local_then_defaults() {
        let store = store();
        let source = pollster::block_on(store.initialize_theme_from_database());
        assert_eq!(source, ThemeSource::Default);
        assert_eq!(store.current_tokens(), Some(ThemeTokens::default()));

        let local = SimpleThemeConfig::new("#dc2626");
        let tokens = store.update_theme(&local);
        store.remote().set_outage(Some(Outage::Unreachable));
        let fresh = ThemeStore::new(store.local(), store.remote(), RootStyle::new());
        assert_eq!(
            pollster::block_on(fresh.initialize_theme_from_database()),
            ThemeSource::Local
        );
        assert_eq!(fresh.current_tokens(), Some(tokens));
    }

    #[test]
    fn startup_needs_both_local_entries() {
        let store = store();
        store.save_theme_tokens(&generate_theme(&violet()));
        assert_eq!(
            pollster::block_on(store.initialize_theme_from_database()),
            ThemeSource::Default
        );
    }
}
