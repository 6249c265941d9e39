//! runmd - run the shell code blocks of a markdown document
//!
//! `runmd <FILE>` opens the document interactively; `runmd run <FILE>` runs
//! its blocks unattended and exits non-zero when any of them failed.

mod app;

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::env;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};

use runmd::config::{Config, ConfigLoader};
use runmd::events;
use runmd::execution::ShellExecutor;
use runmd::report::{ConsoleReporter, NullReporter, Reporter};
use runmd::runner::{run_markdown_with, RunnerOptions};
use runmd::session::Session;

use app::InteractiveApp;

/// Environment variable enabling debug logging (1 or true)
const DEBUG_ENV_VAR: &str = "RUNMD_DEBUG";

#[derive(Debug, Parser)]
#[command(
    name = "runmd",
    version,
    about = "Run the shell code blocks of a markdown document",
    args_conflicts_with_subcommands = true,
    after_help = "CONFIGURATION:\n    runmd looks for configuration files in the following order:\n    1. Path specified with --config\n    2. $RUNMD_CONFIG\n    3. $XDG_CONFIG_HOME/runmd/config.toml\n    4. ~/.runmd/config.toml\n    5. Built-in defaults\n\nENVIRONMENT:\n    RUNMD_CONFIG    Path to configuration file\n    RUNMD_DEBUG     Enable debug logging (1 or true)\n    RUST_LOG        Set logging level (error, warn, info, debug, trace)"
)]
struct Cli {
    /// Markdown document to open interactively
    file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the document's shell blocks unattended
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Markdown document to run
    file: PathBuf,

    /// Skip the remaining blocks after the first failure
    #[arg(long)]
    fail_fast: bool,

    /// Only run these zero-based block indices
    #[arg(long, value_delimiter = ',', value_name = "INDICES")]
    blocks: Option<Vec<usize>>,

    /// Print the result as JSON instead of the progress report
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    }
}

/// Install the stderr log subscriber
fn init_logging(debug: bool) {
    let debug = debug
        || env::var(DEBUG_ENV_VAR).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let log_level = if debug { "debug" } else { "warn" };

    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    debug!("Debug logging enabled");
}

/// Dispatch to the selected mode, returning the process exit code
async fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = load_configuration(cli.config.as_deref())?;

    match (cli.command, cli.file) {
        (Some(Commands::Run(args)), _) => run_headless(args, &config).await,
        (None, Some(file)) => run_interactive(&file, &config).await,
        (None, None) => {
            Cli::command().print_help()?;
            Ok(1)
        }
    }
}

fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = ConfigLoader::resolve(path).context("Failed to load configuration")?;
    debug!("Configuration: {:?}", config);
    Ok(config)
}

async fn run_headless(args: RunArgs, config: &Config) -> anyhow::Result<i32> {
    let mut options = RunnerOptions::new(args.file).fail_fast(args.fail_fast || config.runner.fail_fast);
    if let Some(blocks) = args.blocks {
        options = options.blocks(blocks);
    }

    let executor = ShellExecutor::from_config(&config.shell).with_timeout(config.runner.timeout());
    let mut console;
    let mut silent = NullReporter;
    let reporter: &mut dyn Reporter = if args.json {
        &mut silent
    } else {
        console = ConsoleReporter::stdout();
        &mut console
    };

    let result = run_markdown_with(&options, config, &executor, reporter).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    info!("Batch exit code {}", result.exit_code());
    Ok(result.exit_code())
}

async fn run_interactive(file: &Path, config: &Config) -> anyhow::Result<i32> {
    let (sender, receiver) = events::channel();
    let session = Session::open(file, config, Some(sender))?;

    let name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    InteractiveApp::new(name, session, receiver).run().await?;
    Ok(0)
}
