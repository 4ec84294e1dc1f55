//! defects-browser: terminal browser for bug-fix benchmark datasets
//!
//! Lists, filters and inspects the bugs of a defects dataset together with
//! their repair classification.

#![allow(
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::needless_pass_by_value
)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use defects_browser::{
    browser::{MatchMode, Route},
    cli::{self, auto_detect_format, exit_codes, LabelsQuery, ListQuery, OutputTarget},
    config::{AppConfig, Validatable},
    reports::ReportFormat,
};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "defects-browser")]
#[command(version)]
#[command(about = "Browse bug-fix benchmark datasets and their repair classification", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  No bug matched / bug not found
    3  Error occurred

EXAMPLES:
    # Browse interactively
    defects-browser --bugs data/bugs.json --classification data/classification.json browse

    # Open one bug straight away
    defects-browser browse --route /bug/Closure/12

    # Bugs fixed by adding an if-wrapper, as JSON
    defects-browser list -f wrapsIf -o json

    # Bugs with either pattern, sorted by changed lines
    defects-browser list -f wrapsIf,wrapsElse --match any --sort metrics.lines -o table

    # One bug with its patch
    defects-browser show Closure 12 -o summary")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    data: DataArgs,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Shared argument groups
// ============================================================================

/// Where the data documents come from
#[derive(Args)]
struct DataArgs {
    /// Bug list: a local path or an http(s) URL
    #[arg(long, global = true, env = "DEFECTS_BUGS")]
    bugs: Option<String>,

    /// Classification taxonomy: a local path or an http(s) URL
    #[arg(long, global = true, env = "DEFECTS_CLASSIFICATION")]
    classification: Option<String>,

    /// Timeout for remote requests, in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

/// Initial ordering and filter combination of the list
#[derive(Args)]
struct ViewArgs {
    /// Sort fields, comma-separated (e.g. `project,commit` or `metrics.lines`)
    #[arg(short, long, value_delimiter = ',')]
    sort: Vec<String>,

    /// Sort descending
    #[arg(short, long)]
    reverse: bool,

    /// How filters combine: all or any
    #[arg(short = 'm', long = "match")]
    match_mode: Option<MatchMode>,
}

/// Report format and destination
#[derive(Args)]
struct OutputArgs {
    /// Output format (auto detects TTY: tui if interactive, summary otherwise)
    #[arg(short, long, default_value = "auto")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

impl OutputArgs {
    fn is_interactive(&self) -> bool {
        let target = OutputTarget::from_option(self.output_file.clone());
        auto_detect_format(self.output, &target) == ReportFormat::Tui
    }
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Arguments for the `browse` subcommand
#[derive(Parser)]
struct BrowseArgs {
    /// Start at a route, e.g. `/bug/Closure/12`
    #[arg(long)]
    route: Option<String>,

    /// Skip the welcome panel
    #[arg(long)]
    no_welcome: bool,

    /// Disable mouse support
    #[arg(long)]
    no_mouse: bool,

    /// Color theme: dark, light or high-contrast
    #[arg(long)]
    theme: Option<String>,

    #[command(flatten)]
    view: ViewArgs,
}

/// Arguments for the `list` subcommand
#[derive(Parser)]
struct ListArgs {
    /// Classification keys to filter by, comma-separated
    #[arg(short, long = "filter", value_delimiter = ',')]
    filters: Vec<String>,

    /// Maximum number of bugs to list
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    #[command(flatten)]
    view: ViewArgs,

    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the `show` subcommand
#[derive(Parser)]
struct ShowArgs {
    /// Project name, or a full route such as `/bug/Closure/12`
    target: String,

    /// Bug identifier within the project
    id: Option<String>,

    /// Leave the patch out of the report
    #[arg(long)]
    no_patch: bool,

    #[command(flatten)]
    output: OutputArgs,
}

impl ShowArgs {
    fn route(&self) -> Result<Route> {
        match &self.id {
            Some(id) => Ok(Route::bug(self.target.clone(), id.clone())),
            None => Route::parse(&self.target)
                .with_context(|| format!("'{}' is not a bug route", self.target)),
        }
    }
}

/// Arguments for the `labels` subcommand
#[derive(Parser)]
struct LabelsArgs {
    /// Only list keys of this category (e.g. "Repair Patterns")
    #[arg(long)]
    category: Option<String>,

    /// Count the bugs carrying each key
    #[arg(long)]
    counts: bool,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the dataset interactively
    Browse(BrowseArgs),

    /// List bugs matching classification filters
    List(ListArgs),

    /// Show one bug with its classification and patch
    Show(ShowArgs),

    /// List the classification keys and their labels
    Labels(LabelsArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .defects-browser.yaml in the current directory
    Init {
        /// Write to the user config directory instead
        #[arg(long)]
        global: bool,
    },
}

impl Commands {
    /// Whether this run takes over the terminal.
    fn is_interactive(&self) -> bool {
        match self {
            Self::Browse(_) => true,
            Self::List(args) => args.output.is_interactive(),
            Self::Show(args) => args.output.is_interactive(),
            _ => false,
        }
    }
}

// ============================================================================
// Setup
// ============================================================================

fn init_logging(cli: &Cli) -> Result<()> {
    let interactive = cli.command.is_interactive();
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet || (interactive && cli.log_file.is_none()) {
        "warn"
    } else {
        "info"
    };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
    );

    let file_layer = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = cli.log_file.is_none().then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

/// Config values given on the command line, layered over the config file.
fn cli_overrides(cli: &Cli) -> AppConfig {
    let mut overrides = AppConfig::default();
    if let Some(bugs) = &cli.data.bugs {
        overrides.data.bugs.clone_from(bugs);
    }
    if let Some(classification) = &cli.data.classification {
        overrides.data.classification.clone_from(classification);
    }
    if let Some(timeout) = cli.data.timeout {
        overrides.data.timeout_secs = timeout;
    }
    overrides.output.no_color = cli.no_color;

    let (view, output) = match &cli.command {
        Commands::Browse(args) => {
            overrides.browse.show_welcome = !args.no_welcome;
            overrides.tui.mouse_enabled = !args.no_mouse;
            if let Some(theme) = &args.theme {
                overrides.tui.theme.clone_from(theme);
            }
            (Some(&args.view), None)
        }
        Commands::List(args) => (Some(&args.view), Some(&args.output)),
        Commands::Show(args) => (None, Some(&args.output)),
        Commands::Labels(args) => (None, Some(&args.output)),
        _ => (None, None),
    };
    if let Some(view) = view {
        if !view.sort.is_empty() {
            overrides.browse.sort.clone_from(&view.sort);
        }
        overrides.browse.reverse = view.reverse;
        if let Some(mode) = view.match_mode {
            overrides.browse.match_mode = mode;
        }
    }
    if let Some(output) = output {
        overrides.output.format = output.output;
        overrides.output.file.clone_from(&output.output_file);
    }
    overrides
}

fn effective_config(cli: &Cli) -> AppConfig {
    let (config, loaded_from) =
        AppConfig::from_file_with_overrides(cli.config.as_deref(), &cli_overrides(cli));
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }
    for error in config.validate() {
        tracing::warn!("Config: {error}");
    }
    config
}

fn exit_with(code: i32) -> Result<()> {
    if code != exit_codes::SUCCESS {
        std::process::exit(code);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(&cli).and_then(|()| run(&cli)) {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_codes::ERROR);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Dispatch to command handlers
    match &cli.command {
        Commands::Browse(args) => {
            let config = effective_config(cli);
            exit_with(cli::run_browse(&config, args.route.as_deref())?)
        }

        Commands::List(args) => {
            let config = effective_config(cli);
            let query = ListQuery {
                filters: args.filters.clone(),
                limit: args.limit,
            };
            exit_with(cli::run_list(&config, &query)?)
        }

        Commands::Show(args) => {
            let config = effective_config(cli);
            let route = args.route()?;
            exit_with(cli::run_show(&config, &route, !args.no_patch)?)
        }

        Commands::Labels(args) => {
            let config = effective_config(cli);
            let query = LabelsQuery {
                category: args.category.clone(),
                counts: args.counts,
            };
            exit_with(cli::run_labels(&config, &query)?)
        }

        Commands::Completions { shell } => {
            generate(
                *shell,
                &mut Cli::command(),
                "defects-browser",
                &mut io::stdout(),
            );
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = defects_browser::config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) =
                    defects_browser::config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml =
                    serde_yaml_ng::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    dirs::config_dir().map(|p| p.join("defects-browser").display().to_string()),
                    dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in defects_browser::config::CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match defects_browser::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init { global } => {
                let target = if *global {
                    defects_browser::config::default_config_path()
                } else {
                    std::env::current_dir()
                        .context("cannot determine current directory")?
                        .join(".defects-browser.yaml")
                };
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                let content = defects_browser::config::generate_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}
