mod ui;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use spaces_refs::config::{self, Config};
use spaces_refs::layout::{DisplayConfig, DisplayMode};
use spaces_refs::pathfmt;
use spaces_refs::quota::ReferenceList;
use spaces_refs::resource::{self, Resource, ResourceKind};
use spaces_refs::search;

#[derive(Debug, Parser)]
#[command(
    name = "spaces-refs",
    version,
    about = "Fit reference paths into list rows and keep attachments within quota"
)]
struct Cli {
    /// Path to config TOML (default: ~/.spaces-refs/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Row width in characters (default: config, then terminal width)
    #[arg(long, global = true)]
    width: Option<usize>,

    /// Disable interactive prompts; print everything instead (useful in non-TTY)
    #[arg(long, global = true)]
    no_ui: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Shorten a single path to the row width
    Truncate {
        path: String,

        /// Keep the first folder instead of the file name when space runs out
        #[arg(long)]
        keep_front: bool,

        /// Keep only the tail: `.../parent/name`
        #[arg(long, conflicts_with = "keep_front")]
        from_start: bool,
    },

    /// Render a reference list (JSON array) as rows
    List {
        file: PathBuf,

        #[arg(long, value_enum)]
        mode: Option<DisplayMode>,

        /// Fuzzy filter on name and source
        #[arg(long)]
        filter: Option<String>,
    },

    /// Pick a row and show its full path and hidden segments
    Inspect {
        file: PathBuf,

        #[arg(long, value_enum)]
        mode: Option<DisplayMode>,

        #[arg(long)]
        filter: Option<String>,
    },

    /// Show how much of the quota a reference list uses
    Usage { file: PathBuf },

    /// Attach a reference, refusing it if the quota would be exceeded
    Add {
        file: PathBuf,

        #[arg(long)]
        name: String,

        #[arg(long)]
        source: Option<String>,

        /// Size in bytes
        #[arg(long)]
        size: Option<u64>,

        #[arg(long, value_enum, default_value_t = ResourceKind::File)]
        kind: ResourceKind,

        /// Check the quota without writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove a reference by name and source
    Rm {
        file: PathBuf,
        name: String,

        /// Source of the reference; omit for references without one
        #[arg(long)]
        source: Option<String>,
    },

    /// Print resolved config path and exit
    WhereConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = config::resolve_config_path(cli.config.as_deref())?;
    let cfg = Config::load_or_init(&config_path)?;
    let width = row_width(&cli, &cfg)?;

    match cli.cmd {
        Cmd::WhereConfig => {
            println!("{}", config_path.display());
            Ok(())
        }
        Cmd::Truncate {
            path,
            keep_front,
            from_start,
        } => {
            let t = if from_start {
                pathfmt::truncate_start(&path, width, cfg.display.char_width_factor)
            } else {
                pathfmt::truncate_middle(&path, width, cfg.display.prioritize_end && !keep_front)
            };
            println!("{}", t.display);
            if t.is_truncated() {
                ui::print_info(&format!("hidden: {}", t.hidden.join(" / ")));
            }
            Ok(())
        }
        Cmd::List { file, mode, filter } => {
            let resources = resource::load_resources(&file)?;
            if resources.is_empty() {
                println!("No references.");
                return Ok(());
            }
            let layout = DisplayConfig::preset(mode.unwrap_or(cfg.display.mode));
            let shown = search::filter_resources(&resources, filter.as_deref().unwrap_or(""));
            if shown.is_empty() {
                println!("No references match.");
            } else {
                ui::print_rows(&ui::build_rows(&shown, &layout, width));
            }
            let usage = cfg.quota().usage(&resources);
            ui::print_usage(&usage, width);
            if usage.exceeded {
                ui::print_warn("reference list is over quota");
            }
            Ok(())
        }
        Cmd::Inspect { file, mode, filter } => {
            let resources = resource::load_resources(&file)?;
            let layout = DisplayConfig::preset(mode.unwrap_or(cfg.display.mode));
            let shown = search::filter_resources(&resources, filter.as_deref().unwrap_or(""));
            if shown.is_empty() {
                println!("No references found.");
                return Ok(());
            }
            let rows = ui::build_rows(&shown, &layout, width);
            if cli.no_ui {
                for row in &rows {
                    ui::print_detail(row);
                }
                return Ok(());
            }
            ensure_tty()?;
            let picked = ui::pick_row(&rows)?;
            ui::print_detail(&picked);
            Ok(())
        }
        Cmd::Usage { file } => {
            let resources = resource::load_resources(&file)?;
            let list = ReferenceList::from_resources(resources, cfg.quota());
            ui::print_usage(&list.usage(), width);
            println!("{} references, {} left", list.len(), remaining_text(&list));
            Ok(())
        }
        Cmd::Add {
            file,
            name,
            source,
            size,
            kind,
            dry_run,
        } => {
            let mut list = load_list(&file, &cfg)?;
            let mut item = Resource::new(name).with_kind(kind);
            item.source = source;
            item.file_size = size;
            let label = item.name.clone();
            list.try_add(item)
                .with_context(|| format!("cannot attach to {}", file.display()))?;
            if dry_run {
                ui::print_info(&format!("DRY RUN: {label} fits; {} left", remaining_text(&list)));
                return Ok(());
            }
            resource::save_resources(&file, list.resources())?;
            ui::print_info(&format!("Attached {label}; {} left", remaining_text(&list)));
            Ok(())
        }
        Cmd::Rm { file, name, source } => {
            let mut list = load_list(&file, &cfg)?;
            list.remove(&name, source.as_deref())
                .with_context(|| format!("cannot remove from {}", file.display()))?;
            resource::save_resources(&file, list.resources())?;
            ui::print_info(&format!("Removed {name}"));
            Ok(())
        }
    }
}

fn row_width(cli: &Cli, cfg: &Config) -> Result<usize> {
    match cli.width.or(cfg.display.width) {
        Some(0) => anyhow::bail!("--width must be at least 1"),
        Some(w) => Ok(w),
        None => Ok(ui::terminal_width()),
    }
}

fn load_list(file: &Path, cfg: &Config) -> Result<ReferenceList> {
    let resources = resource::load_resources(file)?;
    Ok(ReferenceList::from_resources(resources, cfg.quota()))
}

fn remaining_text(list: &ReferenceList) -> String {
    spaces_refs::quota::format_bytes(list.remaining())
}

fn ensure_tty() -> Result<()> {
    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        anyhow::bail!(
            "The input device is not a TTY. Re-run with `--no-ui` to print details without prompts."
        );
    }
    Ok(())
}
