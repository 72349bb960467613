use clap::{Args, Parser, Subcommand};
use shotlist::config::{self, ToolConfig};
use shotlist::execute::{self, CancelToken, ExecuteConfig};
use shotlist::imaging::RustBackend;
use shotlist::types::BatchPlan;
use shotlist::{output, plan, scan};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shotlist")]
#[command(about = "Rename and normalize vehicle inspection photo sets")]
#[command(long_about = "\
Rename and normalize vehicle inspection photo sets

Every subdirectory of ROOT is one vehicle. Its name carries the vehicle
identifier, and it must hold exactly 29 JPEGs taken in checklist order:

  ROOT/
  ├── shotlist.toml                       # Optional config for this batch
  ├── 2025_11_06_芜湖_1234567_英菲尼迪/   # dated:    YYYY_M_D_<city>_<id>_...
  │   ├── 1.jpg                           # → 1234567_1_左前45度.jpg
  │   ├── 2.jpg                           # → 1234567_3_右前45度.jpg
  │   └── ...                             # 29 photos in total
  └── 7654321_宝马X5/                     # prefixed: <id>_... (--pattern prefixed)

Photos are paired with the rename table strictly by position: the k-th photo
in natural order (2.jpg before 10.jpg) gets the k-th table name. Units with
the wrong photo count or an unrecognized name are skipped and reported.

Run 'shotlist preview ROOT' first, 'shotlist rules' to see the table, and
'shotlist gen-config' for a documented shotlist.toml.")]
#[command(version)]
struct Cli {
    /// Config file to use instead of ROOT/shotlist.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Flags shared by commands that scan a batch root.
#[derive(Args, Clone)]
struct ScanArgs {
    /// Directory whose subdirectories are unit directories
    root: PathBuf,

    /// How identifiers are read from directory names
    #[arg(long, value_parser = ["dated", "prefixed"])]
    pattern: Option<String>,

    /// Photo ordering inside a unit
    #[arg(long, value_parser = ["natural", "lexicographic"])]
    order: Option<String>,

    /// Rename table
    #[arg(long, value_parser = ["standard", "alternate"])]
    rules: Option<String>,
}

#[derive(Args, Clone)]
struct RunArgs {
    #[command(flatten)]
    scan: ScanArgs,

    /// Execute a plan saved by `preview --save-plan` instead of rescanning
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Keep original file names
    #[arg(long)]
    no_rename: bool,

    /// Re-encode photos onto a fixed canvas
    #[arg(long)]
    normalize: bool,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// JPEG quality (1-100)
    #[arg(long)]
    quality: Option<u32>,

    /// Ignore EXIF orientation
    #[arg(long)]
    no_orientation: bool,

    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show what a run would rename, without touching anything
    Preview {
        #[command(flatten)]
        scan: ScanArgs,

        /// Write the plan as JSON for a later `run --plan`
        #[arg(long)]
        save_plan: Option<PathBuf>,
    },
    /// Rename and/or normalize every planned photo
    Run(RunArgs),
    /// Print a rename table
    Rules {
        /// Rename table
        #[arg(long, value_parser = ["standard", "alternate"])]
        rules: Option<String>,
    },
    /// Print a stock shotlist.toml with all options documented
    GenConfig,
}

/// Command-line values layered over the config files.
#[derive(Default)]
struct FlagOverlay(toml::Table);

impl FlagOverlay {
    fn set(&mut self, section: &str, key: &str, value: impl Into<toml::Value>) {
        let entry = self
            .0
            .entry(section)
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        if let toml::Value::Table(table) = entry {
            table.insert(key.to_string(), value.into());
        }
    }

    fn set_opt<V: Into<toml::Value>>(&mut self, section: &str, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.set(section, key, value);
        }
    }

    fn from_scan_args(args: &ScanArgs) -> Self {
        let mut overlay = Self::default();
        overlay.set_opt("scan", "pattern", args.pattern.clone());
        overlay.set_opt("scan", "order", args.order.clone());
        overlay.set_opt("rules", "table", args.rules.clone());
        overlay
    }

    fn into_value(self) -> Option<toml::Value> {
        if self.0.is_empty() {
            None
        } else {
            Some(toml::Value::Table(self.0))
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::Preview { scan, save_plan } => {
            let config = load_config(&cli, &scan.root, FlagOverlay::from_scan_args(scan))?;
            let plan = scan_and_plan(&scan.root, &config)?;
            output::print_preview(
                &plan,
                &scan.root,
                config.report.max_listed_warnings,
                config.rename.enabled,
            );
            if let Some(path) = save_plan {
                let json = serde_json::to_string_pretty(&plan)?;
                std::fs::write(path, json)?;
                println!("Plan saved to {}", path.display());
            }
        }
        Command::Run(args) => return run(&cli, args),
        Command::Rules { rules } => {
            let mut overlay = FlagOverlay::default();
            overlay.set_opt("rules", "table", rules.clone());
            let config = load_config(&cli, Path::new("."), overlay)?;
            output::print_rules(config.rules.table);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run(cli: &Cli, args: &RunArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let root = &args.scan.root;
    let mut overlay = FlagOverlay::from_scan_args(&args.scan);
    if args.no_rename {
        overlay.set("rename", "enabled", false);
    }
    if args.normalize {
        overlay.set("normalize", "enabled", true);
    }
    overlay.set_opt("normalize", "width", args.width);
    overlay.set_opt("normalize", "height", args.height);
    overlay.set_opt("normalize", "quality", args.quality);
    if args.no_orientation {
        overlay.set("normalize", "correct_orientation", false);
    }
    let config = load_config(cli, root, overlay)?;

    let plan = match &args.plan {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let plan: BatchPlan = serde_json::from_str(&json)?;
            plan
        }
        None => scan_and_plan(root, &config)?,
    };

    let exec_config = ExecuteConfig::from_tool_config(&config);
    execute::validate(&plan, &exec_config)?;

    output::print_preview(
        &plan,
        root,
        config.report.max_listed_warnings,
        exec_config.rename_enabled,
    );
    if plan.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    if !args.yes && !confirm(plan.len())? {
        println!("Aborted, nothing changed.");
        return Ok(ExitCode::SUCCESS);
    }

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        tracing::warn!(error = %e, "Ctrl-C handler not installed");
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let printer_root = root.clone();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_progress_event(&event, &printer_root) {
                println!("{}", line);
            }
        }
    });
    let handle = execute::spawn_execute(
        plan,
        exec_config,
        RustBackend::new(),
        Some(tx),
        Some(cancel),
    );
    let report = handle.join().map_err(|_| "batch worker panicked")??;
    printer.join().map_err(|_| "progress printer panicked")?;

    println!();
    output::print_report(&report, root, config.report.max_listed_failures);

    if report.succeeded == 0 && report.failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "shotlist=debug" } else { "shotlist=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn load_config(
    cli: &Cli,
    root: &Path,
    overlay: FlagOverlay,
) -> Result<ToolConfig, config::ConfigError> {
    config::load_config(root, cli.config.as_deref(), overlay.into_value())
}

/// Scan `root` and plan it, with scan warnings listed before plan skips.
fn scan_and_plan(root: &Path, config: &ToolConfig) -> Result<BatchPlan, scan::ScanError> {
    let result = scan::scan_units(root, config.scan.pattern, config.scan.order)?;
    let mut plan = plan::build_plan(&result.units, config.rules.table);
    let mut skipped = result.warnings;
    skipped.append(&mut plan.skipped);
    plan.skipped = skipped;
    Ok(plan)
}

fn confirm(count: usize) -> std::io::Result<bool> {
    print!("Apply {} changes? [y/N] ", count);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
