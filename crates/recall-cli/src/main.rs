use anyhow::Result;
use clap::{Parser, Subcommand};
use recall_infrastructure::RecallPaths;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::context::AppContext;

/// Log level used when `config.toml` cannot be read.
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Parser)]
#[command(name = "recall")]
#[command(about = "Recall - browse, export and clean up past conversations", long_about = None)]
struct Cli {
    /// Keep config, data and downloads under this directory
    #[arg(long, global = true, env = "RECALL_HOME")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List conversations, newest first
    List {
        /// Only show conversations whose title or messages contain this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Print a conversation
    Show { id: String },
    /// Save a conversation as markdown into the downloads directory
    Export { id: String },
    /// Delete a conversation
    Delete { id: String },
    /// Delete several conversations at once
    DeleteMany {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Hand a conversation over to the overlay window
    Attach { id: String },
    /// Consume the pending overlay handoff, as the overlay window does
    OverlayTake,
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Multi-monitor capture support
    Monitor {
        #[command(subcommand)]
        action: MonitorAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings
    Show,
    /// Set the color theme (system, light, dark)
    Theme { theme: String },
    /// Set the UI language
    Language { language: String },
    /// Toggle hiding to the tray on close
    CloseToTray,
}

#[derive(Subcommand)]
enum MonitorAction {
    /// Report helper tools and whether the warning would be shown
    Check,
    /// Never show the warning again
    Dismiss,
    /// Copy the suggested install command to the clipboard
    CopyCommand,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (paths, config) = match AppContext::load_config(cli.home.clone()) {
        Ok(loaded) => loaded,
        Err(e) => {
            let fallback = RecallPaths::new(cli.home);
            let _log_guard = init_tracing(DEFAULT_LOG_LEVEL, fallback.logs_dir().ok());
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(e);
        }
    };
    let _log_guard = init_tracing(&config.log_level, paths.logs_dir().ok());
    tracing::debug!(config_dir = ?paths.config_dir().ok(), "Recall started");

    let ctx = match AppContext::bootstrap(paths, config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open stores");
            return Err(e);
        }
    };

    match cli.command {
        Commands::List { search } => commands::history::list(&ctx, search).await?,
        Commands::Show { id } => commands::history::show(&ctx, &id).await?,
        Commands::Export { id } => commands::history::export(&ctx, &id).await?,
        Commands::Delete { id } => commands::history::delete(&ctx, id).await?,
        Commands::DeleteMany { ids } => commands::history::delete_many(&ctx, &ids).await?,
        Commands::Attach { id } => commands::history::attach(&ctx, &id).await?,
        Commands::OverlayTake => commands::history::overlay_take(&ctx).await?,
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(&ctx).await?,
            SettingsAction::Theme { theme } => commands::settings::theme(&ctx, &theme).await?,
            SettingsAction::Language { language } => {
                commands::settings::language(&ctx, language).await?
            }
            SettingsAction::CloseToTray => commands::settings::close_to_tray(&ctx).await?,
        },
        Commands::Monitor { action } => match action {
            MonitorAction::Check => commands::monitor::check(&ctx).await?,
            MonitorAction::Dismiss => commands::monitor::dismiss(&ctx).await?,
            MonitorAction::CopyCommand => commands::monitor::copy_command(&ctx).await?,
        },
    }

    Ok(())
}

/// Logs to stderr and, when the logs directory is usable, to a daily file.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(level: &str, logs_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "recall={level},recall_core={level},recall_infrastructure={level},recall_application={level}"
        ))
    });

    let (file_layer, guard) = match logs_dir.filter(|dir| std::fs::create_dir_all(dir).is_ok()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "recall.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}
