//! Bazaar CLI
//!
//! Operator front end for the theme engine: generate and apply themes,
//! publish one for every user, and render the resolved root stylesheet.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use bazaar_theme::{BackgroundStyle, Roundness, SimpleThemeConfig};

mod commands;
mod config;

use config::{BazaarConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar theme engine CLI", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tokens generated for a theme without touching any state
    Generate {
        #[command(flatten)]
        theme: ThemeArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Apply a personal theme on this device
    Apply {
        #[command(flatten)]
        theme: ThemeArgs,
    },

    /// Clear the personal theme and fall back to the defaults
    Reset,

    /// Export the personal theme as an interchange document
    Export {
        /// Output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import an interchange document as the personal theme
    Import {
        /// Document to import
        file: PathBuf,
    },

    /// Publish a theme for every user
    Publish {
        #[command(flatten)]
        theme: ThemeArgs,
    },

    /// Create the shared settings table
    Provision,

    /// Resolve the startup theme and fonts, then write the stylesheet
    Init,

    /// Font catalog and selection
    Fonts {
        #[command(subcommand)]
        command: FontsCommand,
    },

    /// Show the resolved theme
    Show,

    /// Configuration file management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum FontsCommand {
    /// List the heading and body font catalogs
    List,

    /// Choose the heading and body fonts
    Set {
        #[arg(long)]
        heading: String,
        #[arg(long)]
        body: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write a default bazaar.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Css,
}

/// The user-facing theme choices
#[derive(Args, Debug)]
struct ThemeArgs {
    /// Brand color (hex)
    #[arg(long, default_value = "#10B981")]
    primary: String,

    /// Accent color (hex); derived from the primary color when omitted
    #[arg(long)]
    accent: Option<String>,

    /// clean-white, dim-gray, warm-beige or dark-mode
    #[arg(long, default_value_t = BackgroundStyle::default())]
    background: BackgroundStyle,

    /// sharp, rounded or full
    #[arg(long, default_value_t = Roundness::default())]
    roundness: Roundness,

    /// Heading font family
    #[arg(long)]
    heading_font: Option<String>,

    /// Body font family
    #[arg(long)]
    body_font: Option<String>,
}

impl ThemeArgs {
    fn to_config(&self) -> SimpleThemeConfig {
        SimpleThemeConfig {
            primary_color: self.primary.clone(),
            accent_color: self.accent.clone(),
            background_color: self.background,
            roundness: self.roundness,
            heading_font: self.heading_font.clone(),
            body_font: self.body_font.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = BazaarConfig::load(&cli.config)?;
    init_logging(
        cli.verbose,
        loaded.as_ref().map(|c| c.logging.level.as_str()),
    );
    if loaded.is_none() {
        debug!(path = %cli.config.display(), "no config file; using defaults");
    }
    let config = loaded.unwrap_or_default();

    match cli.command {
        Commands::Generate { theme, format } => commands::generate(&theme.to_config(), format),
        Commands::Apply { theme } => commands::apply(&config, &theme.to_config()),
        Commands::Reset => commands::reset(&config),
        Commands::Export { output } => commands::export(&config, output.as_deref()),
        Commands::Import { file } => commands::import(&config, &file),
        Commands::Publish { theme } => commands::publish(&config, &theme.to_config()).await,
        Commands::Provision => commands::provision(&config),
        Commands::Init => commands::init(&config).await.map(|_| ()),
        Commands::Fonts { command } => match command {
            FontsCommand::List => commands::list_fonts(),
            FontsCommand::Set { heading, body } => {
                commands::set_fonts(&config, &heading, &body).await
            }
        },
        Commands::Show => commands::show(&config).await,
        Commands::Config { command } => match command {
            ConfigCommand::Init { force } => commands::init_config(&cli.config, force),
        },
    }
}

/// `-v` wins, then `RUST_LOG`, then the config file's level
fn init_logging(verbose: bool, configured: Option<&str>) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(configured.unwrap_or("info")))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn theme_args_parse_into_config() {
        let cli = Cli::try_parse_from([
            "bazaar",
            "apply",
            "--primary",
            "#7c3aed",
            "--background",
            "dark-mode",
            "--roundness",
            "full",
            "--heading-font",
            "Lora",
        ])
        .unwrap();
        let Commands::Apply { theme } = cli.command else {
            panic!("expected apply");
        };
        let config = theme.to_config();
        assert_eq!(config.primary_color, "#7c3aed");
        assert_eq!(config.background_color, BackgroundStyle::DarkMode);
        assert_eq!(config.roundness, Roundness::Full);
        assert_eq!(config.heading_font.as_deref(), Some("Lora"));
        assert_eq!(config.body_font, None);
    }

    #[test]
    fn theme_args_default_to_the_default_config() {
        let cli = Cli::try_parse_from(["bazaar", "generate"]).unwrap();
        let Commands::Generate { theme, format } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(format, Format::Json);
        assert_eq!(theme.to_config(), SimpleThemeConfig::default());
    }

    #[test]
    fn unknown_background_is_rejected() {
        assert!(Cli::try_parse_from(["bazaar", "apply", "--background", "neon"]).is_err());
    }
}
