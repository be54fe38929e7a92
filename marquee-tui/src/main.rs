use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marquee_core::{filter, CatalogStore};
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod config;
mod fetch;
mod grid;
mod poster;
mod theme;

use fetch::ManifestSource;
use grid::{GridOptions, GridSession};

#[derive(Parser)]
#[command(name = "marquee", version, about = "Lazy-loading poster grid for a catalog manifest")]
struct Cli {
    /// Manifest URL or file (overrides settings)
    #[arg(long, global = true)]
    manifest: Option<String>,
    /// Asset root URL or directory holding `images/` (overrides settings)
    #[arg(long, global = true)]
    assets: Option<String>,
    /// Number of grid columns (overrides settings)
    #[arg(long, global = true)]
    columns: Option<u16>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive poster grid (default)
    Browse,
    /// Print the catalog, optionally filtered, without loading any posters
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Print the settings file location
    ConfigPath,
}

#[derive(Serialize)]
struct ListedItem<'a> {
    index: usize,
    name: &'a str,
    poster_path: &'a str,
    loaded: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Browse);
    init_logging(matches!(command, Commands::Browse));

    let settings = config::load_settings();
    let resolved = settings.resolve(cli.manifest, cli.assets, cli.columns);
    let source = ManifestSource::parse(&resolved.manifest);

    match command {
        Commands::ConfigPath => {
            println!("{}", config::settings_path().display());
        }
        Commands::List { search, json } => {
            let (_, entries) = fetch::load_catalog(&source);
            let mut store = CatalogStore::new();
            if let Some(entries) = entries {
                store.initialize(entries)?;
            }
            let term = search.unwrap_or_default();
            let view = filter::apply(&term, store.snapshot());
            if json {
                let items: Vec<ListedItem> = view
                    .iter()
                    .map(|(index, item)| ListedItem {
                        index: *index,
                        name: &item.name,
                        poster_path: &item.poster_path,
                        loaded: item.loaded,
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for (index, item) in view {
                    println!("{}\t{}\t{}", index, item.name, item.poster_path);
                }
            }
        }
        Commands::Browse => {
            let (title, entries) = fetch::load_catalog(&source);
            let opts = GridOptions {
                title,
                asset_root: resolved.asset_root.clone(),
                columns: resolved.columns,
                tile_height: resolved.tile_height,
                theme: theme::GridTheme::from_settings(settings.tui.as_ref()),
            };
            let mut session = GridSession::new(entries, opts).context("building grid")?;
            grid::run_grid_default(&mut session, resolved.alt_screen)?;
        }
    }

    Ok(())
}

/// `MARQUEE_LOG` wins over `RUST_LOG`; default is `warn`. The interactive
/// grid owns the terminal, so it logs to a file in the state dir, or
/// nowhere if that file cannot be opened.
fn init_logging(interactive: bool) {
    let filter = EnvFilter::try_from_env("MARQUEE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if !interactive {
        builder.with_writer(std::io::stderr).init();
        return;
    }
    match open_log_file(&config::state_dir()) {
        Some(file) => builder
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init(),
        None => builder.with_writer(std::io::sink).init(),
    }
}

fn open_log_file(dir: &Path) -> Option<File> {
    std::fs::create_dir_all(dir).ok()?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("marquee.log"))
        .ok()
}
