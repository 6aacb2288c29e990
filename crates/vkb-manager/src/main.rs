//! `vkb-layout`: resolve one keyboard and print its geometry.
//!
//! Loads layout definitions (bundled, or from `--layouts-dir`), builds a
//! [`LayoutRequest`] from the command line, resolves one element through the
//! [`LayoutManager`], and prints the result.
//!
//! # Usage
//!
//! ```text
//! vkb-layout [OPTIONS]
//!
//! Options:
//!   --layout <ID>             Layout set id [default: from config, "qwerty"]
//!   --locale <TAG>            BCP 47 locale [default: from config, "en-US"]
//!   --width <PX>              Target width [default: 1080]
//!   --height <PX>             Target height [default: 600]
//!   --kind <KIND>             alphabet | symbols | phone | number | number_basic
//!   --page <PAGE>             base | shifted | manually_shifted | shift_locked | alt0..alt3
//!   --number-row <MODE>       Insert a number row: default | classic
//!   --arrow-row               Append the arrow row
//!   --alt-period              Use the alternative period key
//!   --local-numbers           Use the locale's own digits in the number row
//!   --bottom-action <KEY>     emoji | language-switch | settings | voice-input
//!   --multilingual <TAGS>     Comma-separated secondary typing locales
//!   --mode <MODE>             Editor input mode [default: text]
//!   --layouts-dir <DIR>       Read layout JSON files from this directory
//!   --config <FILE>           Config file [default: platform config dir]
//!   --format <FORMAT>         json | table | legacy [default: json]
//!   --save-config             Store layout, locale and layouts dir as defaults
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable          | Flag            |
//! |-------------------|-----------------|
//! | `VKB_LAYOUT`      | `--layout`      |
//! | `VKB_LOCALE`      | `--locale`      |
//! | `VKB_LAYOUTS_DIR` | `--layouts-dir` |
//! | `VKB_CONFIG`      | `--config`      |
//!
//! The log level comes from `RUST_LOG`, then from the config file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use vkb_core::domain::request::{BottomActionKey, EditorContext, KeyboardMode, NumberRowMode};
use vkb_core::{
    BundledResources, ComputedSize, LayoutElement, LayoutKind, LayoutPage, LayoutRequest, Locale,
    ResolvedKeyboard, ResourceProvider,
};
use vkb_manager::application::layout_manager::LayoutManager;
use vkb_manager::infrastructure::resources::directory::DirectoryResources;
use vkb_manager::infrastructure::storage::config::{self, AppConfig, ConfigError};

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
    Legacy,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NumberRowArg {
    Default,
    Classic,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BottomActionArg {
    Emoji,
    LanguageSwitch,
    Settings,
    VoiceInput,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Text,
    Url,
    Email,
    Im,
    Phone,
    Number,
    Date,
    Time,
    DateTime,
}

/// Resolve a virtual keyboard layout and print its key geometry.
#[derive(Debug, Parser)]
#[command(name = "vkb-layout", about = "Resolve a virtual keyboard layout and print its geometry", version)]
struct Cli {
    /// Layout set id, e.g. `qwerty`.
    #[arg(long, env = "VKB_LAYOUT")]
    layout: Option<String>,

    /// Locale tag, e.g. `en-US`.
    #[arg(long, env = "VKB_LOCALE")]
    locale: Option<Locale>,

    #[arg(long, default_value_t = 1080)]
    width: i32,

    #[arg(long, default_value_t = 600)]
    height: i32,

    #[arg(long, default_value = "alphabet")]
    kind: LayoutKind,

    #[arg(long, default_value = "base")]
    page: LayoutPage,

    /// Insert a number row of the given shape.
    #[arg(long, value_enum)]
    number_row: Option<NumberRowArg>,

    #[arg(long)]
    arrow_row: bool,

    #[arg(long)]
    alt_period: bool,

    #[arg(long)]
    local_numbers: bool,

    #[arg(long, value_enum)]
    bottom_action: Option<BottomActionArg>,

    /// Secondary typing locales whose long-press variants are merged in.
    #[arg(long, value_delimiter = ',')]
    multilingual: Vec<Locale>,

    #[arg(long, value_enum, default_value_t = ModeArg::Text)]
    mode: ModeArg,

    /// Directory of layout JSON files; overrides the config file.
    #[arg(long, env = "VKB_LAYOUTS_DIR")]
    layouts_dir: Option<PathBuf>,

    /// Config file path; the platform config directory when absent.
    #[arg(long, env = "VKB_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write the effective layout, locale and layouts directory back to the
    /// config file so later runs start from them.
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    /// Builds the layout request, filling gaps from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured default locale is not a valid tag.
    fn to_request(&self, config: &AppConfig) -> anyhow::Result<LayoutRequest> {
        let layout = self
            .layout
            .clone()
            .unwrap_or_else(|| config.engine.default_layout.clone());
        let locale = match &self.locale {
            Some(locale) => locale.clone(),
            None => Locale::parse(&config.engine.default_locale).with_context(|| {
                format!("invalid default_locale in config: '{}'", config.engine.default_locale)
            })?,
        };

        let number_row_mode = match self.number_row {
            Some(NumberRowArg::Classic) => NumberRowMode::Classic,
            _ => NumberRowMode::Default,
        };
        let bottom_action_key = self.bottom_action.map(|key| match key {
            BottomActionArg::Emoji => BottomActionKey::Emoji,
            BottomActionArg::LanguageSwitch => BottomActionKey::LanguageSwitch,
            BottomActionArg::Settings => BottomActionKey::Settings,
            BottomActionArg::VoiceInput => BottomActionKey::VoiceInput,
        });

        Ok(
            LayoutRequest::new(layout, locale, ComputedSize::regular(self.width, self.height))
                .with_editor_context(EditorContext::with_mode(self.mode.into()))
                .with_number_row(self.number_row.is_some(), number_row_mode)
                .with_arrow_row(self.arrow_row)
                .with_alternative_period_key(self.alt_period)
                .with_local_numbers(self.local_numbers)
                .with_bottom_action_key(bottom_action_key)
                .with_multilingual_locales(self.multilingual.clone()),
        )
    }
}

impl From<ModeArg> for KeyboardMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Text => Self::Text,
            ModeArg::Url => Self::Url,
            ModeArg::Email => Self::Email,
            ModeArg::Im => Self::Im,
            ModeArg::Phone => Self::Phone,
            ModeArg::Number => Self::Number,
            ModeArg::Date => Self::Date,
            ModeArg::Time => Self::Time,
            ModeArg::DateTime => Self::DateTime,
        }
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_table(keyboard: &ResolvedKeyboard) {
    println!(
        "{} {} ({}) {}x{}  gap {}x{}  common key {}x{}",
        keyboard.layout_id,
        keyboard.element,
        keyboard.locale,
        keyboard.base_width,
        keyboard.base_height,
        keyboard.horizontal_gap,
        keyboard.vertical_gap,
        keyboard.most_common_key_width,
        keyboard.most_common_key_height,
    );
    println!("{:>3} {:>3}  {:<8} {:>7} {:>5} {:>5} {:>5} {:>5}", "row", "col", "label", "code", "x", "y", "w", "h");
    for key in &keyboard.keys {
        println!(
            "{:>3} {:>3}  {:<8} {:>7} {:>5} {:>5} {:>5} {:>5}",
            key.row, key.column, key.label, key.code, key.x, key.y, key.width, key.height
        );
    }
}

/// Persists the defaults this run resolved with.
fn save_defaults(
    path: Option<&PathBuf>,
    mut app_config: AppConfig,
    request: &LayoutRequest,
    layouts_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    app_config.engine.default_layout = request.keyboard_layout_set_id.clone();
    app_config.engine.default_locale = request.locale.to_string();
    app_config.resources.layouts_dir = layouts_dir;
    match path {
        Some(path) => config::save_config_to(&app_config, path),
        None => config::save_config(&app_config),
    }
    .context("failed to save configuration")?;
    info!(layout = %request.keyboard_layout_set_id, locale = %request.locale, "saved defaults");
    Ok(())
}

fn load_app_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let result = match path {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    match result {
        Err(ConfigError::NoPlatformConfigDir) => Ok(AppConfig::default()),
        other => other.context("failed to load configuration"),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let app_config = load_app_config(cli.config.as_ref())?;

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&app_config.logging.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let manager = Arc::new(LayoutManager::new(app_config.engine.resolver_cache_capacity()));
    let layouts_dir = cli.layouts_dir.clone().or_else(|| app_config.resources.layouts_dir.clone());
    let provider: Box<dyn ResourceProvider> = match layouts_dir.clone() {
        Some(dir) => {
            info!(dir = %dir.display(), "loading layouts from directory");
            Box::new(DirectoryResources::new(dir))
        }
        None => Box::new(BundledResources),
    };
    manager
        .init(provider.as_ref())
        .context("failed to load layout definitions")?;

    let request = cli.to_request(&app_config)?;
    let element = LayoutElement::new(cli.kind, cli.page);
    debug!(?request, %element, "resolving keyboard");

    let keyboard = manager.get_keyboard(&request, element).with_context(|| {
        format!(
            "failed to resolve {element} for layout '{}' ({})",
            request.keyboard_layout_set_id, request.locale
        )
    })?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(keyboard.as_ref())?),
        OutputFormat::Legacy => {
            println!("{}", serde_json::to_string_pretty(&keyboard.to_layout_table())?)
        }
        OutputFormat::Table => print_table(&keyboard),
    }

    if cli.save_config {
        save_defaults(cli.config.as_ref(), app_config, &request, layouts_dir)?;
    }

    manager.shutdown();
    Ok(())
}
