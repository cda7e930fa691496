use clap::Parser;
use deadwire::{Config, DeadCodeAnalyzer, DeadCodeItem, ReportFormat, Reporter};
use miette::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// deadwire - dead code and DI wiring analysis for TypeScript projects
#[derive(Parser, Debug)]
#[command(name = "deadwire")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project's tsconfig.json
    #[arg(default_value = "tsconfig.json")]
    tsconfig: PathBuf,

    /// Path to an analyzer settings file (YAML or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Output file (json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Class name glob never to report (can be specified multiple times)
    #[arg(long, value_name = "GLOB")]
    allow_class: Vec<String>,

    /// File glob never to report (can be specified multiple times)
    #[arg(long, value_name = "GLOB")]
    allow_file: Vec<String>,

    /// Also report exported functions without call-sites
    #[arg(long)]
    functions: bool,

    /// Exit with status 1 when anything is reported
    #[arg(long)]
    fail_on_findings: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("deadwire v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let analyzer = DeadCodeAnalyzer::new(config)?;
    let items = analyzer.analyze(&cli.tsconfig)?;

    let root = project_root(&cli.tsconfig);
    let items: Vec<DeadCodeItem> = items
        .into_iter()
        .map(|item| relative_to(item, &root))
        .collect();

    let reporter = Reporter::new(cli.format.into(), cli.output.clone());
    reporter.report(&items)?;

    if cli.fail_on_findings && !items.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&project_root(&cli.tsconfig))?
    };

    // Override with CLI arguments
    config.allowlist.classes.extend(cli.allow_class.iter().cloned());
    config.allowlist.files.extend(cli.allow_file.iter().cloned());
    if cli.functions {
        config.detection.dead_functions = true;
    }

    Ok(config)
}

/// Directory holding the tsconfig; findings are shown relative to it
fn project_root(tsconfig: &Path) -> PathBuf {
    let path = std::fs::canonicalize(tsconfig).unwrap_or_else(|_| tsconfig.to_path_buf());
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn relative_to(mut item: DeadCodeItem, root: &Path) -> DeadCodeItem {
    if let Ok(relative) = item.file.strip_prefix(root) {
        item.file = relative.to_path_buf();
    }
    item
}
