//! Command implementations

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use bazaar_theme::fonts::{self, FontConfig, BODY_FONTS, HEADING_FONTS};
use bazaar_theme::store::SETTINGS_TABLE;
use bazaar_theme::{
    generate_theme, DirectoryRemote, FileStorage, FontOption, RootStyle, SimpleThemeConfig,
    ThemeSource, ThemeStore,
};

use crate::config::{BazaarConfig, CONFIG_FILE};
use crate::Format;

type Store = ThemeStore<FileStorage, DirectoryRemote, RootStyle>;

fn open_store(config: &BazaarConfig) -> Store {
    let store = ThemeStore::new(
        FileStorage::new(&config.storage.local_path),
        DirectoryRemote::new(&config.storage.remote_dir),
        RootStyle::new(),
    );
    debug!(
        local = %store.local().path().display(),
        remote = %store.remote().root().display(),
        "opened theme store"
    );
    store
}

/// Apply the saved fonts on top of whatever theme is live and write the
/// stylesheet
fn write_stylesheet(store: &Store, config: &BazaarConfig) -> Result<()> {
    fonts::initialize_fonts(store.local(), store.document());

    let path = &config.output.stylesheet;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, store.document().to_css())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote stylesheet");
    Ok(())
}

fn check_colors(theme: &SimpleThemeConfig) -> Result<()> {
    theme.validate().context("Invalid theme color")
}

/// Persist the font half of a theme config, keeping the saved choice for
/// whichever side was not given
fn adopt_fonts(store: &Store, theme: &SimpleThemeConfig) {
    if theme.heading_font.is_none() && theme.body_font.is_none() {
        return;
    }
    let current = fonts::load_font_config(store.local()).unwrap_or_default();
    let chosen = FontConfig {
        heading: theme.heading_font.clone().unwrap_or(current.heading),
        body: theme.body_font.clone().unwrap_or(current.body),
    };
    fonts::save_font_config(store.local(), &chosen);
}

pub fn generate(theme: &SimpleThemeConfig, format: Format) -> Result<()> {
    if let Err(e) = theme.validate() {
        warn!(error = %e, "generating with fallback colors");
    }
    let tokens = generate_theme(theme);
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&tokens)?),
        Format::Css => print!(":root {{\n{}}}\n", tokens.to_css_declarations()),
    }
    Ok(())
}

fn describe(theme: &SimpleThemeConfig) -> String {
    format!(
        "{} ({}, {})",
        theme.primary_color,
        theme.background_color.display_name(),
        theme.roundness.display_name()
    )
}

pub fn apply(config: &BazaarConfig, theme: &SimpleThemeConfig) -> Result<()> {
    check_colors(theme)?;
    let store = open_store(config);
    store.update_theme(theme);
    adopt_fonts(&store, theme);
    write_stylesheet(&store, config)?;
    println!("Applied theme {}", describe(theme));
    Ok(())
}

pub fn reset(config: &BazaarConfig) -> Result<()> {
    let store = open_store(config);
    store.reset_theme();
    write_stylesheet(&store, config)?;
    println!("Theme reset to defaults");
    Ok(())
}

pub fn export(config: &BazaarConfig, output: Option<&Path>) -> Result<()> {
    let store = open_store(config);
    let document = store.export_theme()?;
    match output {
        Some(path) => {
            fs::write(path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported theme to {}", path.display());
        }
        None => println!("{document}"),
    }
    Ok(())
}

pub fn import(config: &BazaarConfig, file: &Path) -> Result<()> {
    let document = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let store = open_store(config);
    if !store.import_theme(&document) {
        bail!("{} is not a usable theme document", file.display());
    }
    write_stylesheet(&store, config)?;
    println!("Imported theme from {}", file.display());
    Ok(())
}

pub async fn publish(config: &BazaarConfig, theme: &SimpleThemeConfig) -> Result<()> {
    check_colors(theme)?;
    let store = open_store(config);
    if !store.publish_theme_to_all_users(theme).await {
        bail!(
            "Failed to publish the global theme. Run `bazaar provision` if {} has no {SETTINGS_TABLE} table.",
            config.storage.remote_dir.display()
        );
    }
    adopt_fonts(&store, theme);
    write_stylesheet(&store, config)?;
    println!("Published theme {} to all users", describe(theme));
    Ok(())
}

pub fn provision(config: &BazaarConfig) -> Result<()> {
    let store = open_store(config);
    store
        .remote()
        .provision(SETTINGS_TABLE)
        .with_context(|| format!("Failed to provision {SETTINGS_TABLE}"))?;
    println!(
        "Provisioned {SETTINGS_TABLE} in {}",
        store.remote().root().display()
    );
    Ok(())
}

pub async fn init(config: &BazaarConfig) -> Result<ThemeSource> {
    let store = open_store(config);
    let source = store.initialize_theme_from_database().await;
    write_stylesheet(&store, config)?;
    println!("Initialized {} theme", source_label(source));
    Ok(source)
}

pub fn list_fonts() -> Result<()> {
    println!("Heading fonts:");
    print_catalog(HEADING_FONTS);
    println!();
    println!("Body fonts:");
    print_catalog(BODY_FONTS);
    Ok(())
}

fn print_catalog(catalog: &[FontOption]) {
    for option in catalog {
        let source = if option.is_web_font { "web" } else { "system" };
        println!(
            "  {:<20} {:<12} {}",
            option.name,
            option.category.generic_family(),
            source
        );
    }
}

pub async fn set_fonts(config: &BazaarConfig, heading: &str, body: &str) -> Result<()> {
    for family in [heading, body] {
        if fonts::find_font(family).is_none() {
            bail!("Unknown font `{family}`. Run `bazaar fonts list` to see the catalog.");
        }
    }
    let store = open_store(config);
    fonts::save_font_config(
        store.local(),
        &FontConfig {
            heading: heading.to_string(),
            body: body.to_string(),
        },
    );
    store.initialize_theme_from_database().await;
    write_stylesheet(&store, config)?;
    println!("Fonts set to {heading} / {body}");
    Ok(())
}

pub async fn show(config: &BazaarConfig) -> Result<()> {
    let store = open_store(config);
    let source = store.initialize_theme_from_database().await;
    fonts::initialize_fonts(store.local(), store.document());
    println!("/* {} theme */", source_label(source));
    print!("{}", store.document().to_css());
    let links = store.document().to_link_tags();
    if !links.is_empty() {
        println!();
        print!("{links}");
    }
    Ok(())
}

pub fn init_config(path: &Path, force: bool) -> Result<()> {
    let path = if path.is_dir() {
        path.join(CONFIG_FILE)
    } else {
        path.to_path_buf()
    };
    if path.exists() && !force {
        bail!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        );
    }
    fs::write(&path, BazaarConfig::default().to_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn source_label(source: ThemeSource) -> &'static str {
    match source {
        ThemeSource::Global => "global",
        ThemeSource::Local => "local",
        ThemeSource::Default => "default",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_theme::{BackgroundStyle, ThemeTokens};
    use tempfile::TempDir;

    fn workspace() -> (TempDir, BazaarConfig) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = BazaarConfig::default();
        config.storage.local_path = dir.path().join("local.json");
        config.storage.remote_dir = dir.path().join("remote");
        config.output.stylesheet = dir.path().join("public").join("theme.css");
        (dir, config)
    }

    fn stylesheet(config: &BazaarConfig) -> String {
        fs::read_to_string(&config.output.stylesheet).unwrap()
    }

    #[test]
    fn apply_writes_the_stylesheet() {
        let (_dir, config) = workspace();
        let theme = SimpleThemeConfig::new("#7c3aed").with_background(BackgroundStyle::DarkMode);
        apply(&config, &theme).unwrap();

        let css = stylesheet(&config);
        assert!(css.starts_with(":root {\n"));
        assert!(css.contains("  --color-primary: #7c3aed;\n"));
        assert!(css.contains(&format!(
            "  --bg-primary: {};\n",
            BackgroundStyle::DarkMode.preset().bg_primary
        )));
    }

    #[test]
    fn apply_rejects_bad_colors_without_writing() {
        let (_dir, config) = workspace();
        assert!(apply(&config, &SimpleThemeConfig::new("teal")).is_err());
        assert!(!config.output.stylesheet.exists());
    }

    #[test]
    fn apply_with_fonts_links_the_web_fonts() {
        let (_dir, config) = workspace();
        let theme = SimpleThemeConfig::default().with_fonts("Lora", "Inter");
        apply(&config, &theme).unwrap();

        let css = stylesheet(&config);
        assert!(css.starts_with("@import url(\"https://fonts.googleapis.com/css2?"));
        assert!(css.contains("family=Lora:wght@400;600;700"));
        assert!(css.contains("  --heading-font: 'Lora', serif;\n"));
    }

    #[test]
    fn reset_renders_defaults() {
        let (_dir, config) = workspace();
        apply(&config, &SimpleThemeConfig::new("#dc2626")).unwrap();
        reset(&config).unwrap();

        let defaults = ThemeTokens::default();
        assert!(stylesheet(&config).contains(&format!("  --color-primary: {};\n", defaults.primary)));
    }

    #[tokio::test]
    async fn publish_needs_a_provisioned_table() {
        let (_dir, config) = workspace();
        let theme = SimpleThemeConfig::new("#0d9488");
        assert!(publish(&config, &theme).await.is_err());

        provision(&config).unwrap();
        publish(&config, &theme).await.unwrap();
        assert_eq!(init(&config).await.unwrap(), ThemeSource::Global);
    }

    #[tokio::test]
    async fn init_reports_the_winning_tier() {
        let (_dir, config) = workspace();
        assert_eq!(init(&config).await.unwrap(), ThemeSource::Default);

        apply(&config, &SimpleThemeConfig::new("#dc2626")).unwrap();
        assert_eq!(init(&config).await.unwrap(), ThemeSource::Local);
        assert!(stylesheet(&config).contains("  --color-primary: #dc2626;\n"));
    }

    #[test]
    fn export_then_import_round_trips() {
        let (dir, config) = workspace();
        apply(&config, &SimpleThemeConfig::new("#9333ea")).unwrap();
        let file = dir.path().join("theme.json");
        export(&config, Some(&file)).unwrap();

        reset(&config).unwrap();
        import(&config, &file).unwrap();
        assert!(stylesheet(&config).contains("  --color-primary: #9333ea;\n"));
    }

    #[test]
    fn import_rejects_empty_documents() {
        let (dir, config) = workspace();
        let file = dir.path().join("empty.json");
        fs::write(&file, "{}").unwrap();
        assert!(import(&config, &file).is_err());
    }

    #[tokio::test]
    async fn set_fonts_checks_the_catalog() {
        let (_dir, config) = workspace();
        assert!(set_fonts(&config, "Comic Sans", "Inter").await.is_err());

        set_fonts(&config, "Playfair Display", "Source Serif").await.unwrap();
        let css = stylesheet(&config);
        assert!(css.contains("family=Playfair+Display:wght@400;600;700"));
        assert!(css.contains("family=Source+Serif+4:wght@400;500;600"));
        assert_eq!(css.matches("@import").count(), 1);
        assert!(css.contains("  --body-font: 'Source Serif 4', serif;\n"));
    }

    #[test]
    fn describe_uses_display_names() {
        let theme = SimpleThemeConfig::new("#7c3aed")
            .with_background(BackgroundStyle::DarkMode)
            .with_roundness(bazaar_theme::Roundness::Full);
        assert_eq!(
            describe(&theme),
            format!(
                "#7c3aed ({}, {})",
                BackgroundStyle::DarkMode.display_name(),
                bazaar_theme::Roundness::Full.display_name()
            )
        );
    }

    #[test]
    fn config_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), false).unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert!(path.is_file());
        assert!(init_config(&path, false).is_err());
        init_config(&path, true).unwrap();
    }
}
