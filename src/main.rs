use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

use vulngate_core::{Settings, VulngateConfig, VulngateError};
use vulngate_scan::pipeline::{self, Outcome};
use vulngate_scan::verdict::RESULT_FILE;

/// Exit status for a malformed command line.
const USAGE_EXIT_CODE: i32 = 2;

const DEFAULT_CONFIG_FILE: &str = ".vulngate.toml";

#[derive(Parser)]
#[command(
    name = "vulngate",
    version,
    about = "Gate a pull request on an LLM's OWASP Top 10 verdict",
    long_about = "Sends a pull-request diff to a hosted text-generation model and asks for a\n\
                   single PASS or FAIL answer against the OWASP Top 10.\n\n\
                   Writes result.txt (verdict, then model) to the working directory and exits\n\
                   0 on PASS, 1 on FAIL, 2 on a usage error.\n\n\
                   Environment:\n  \
                     HF_TOKEN        Bearer token for the inference API (required)\n  \
                     HF_MODEL        Model identifier (default: HuggingFaceH4/zephyr-7b-beta)\n  \
                     MAX_DIFF_CHARS  Truncate longer diffs to this many characters (default: 12000)\n  \
                     HF_API_BASE     Inference API root (default: https://api-inference.huggingface.co)\n\n\
                   Examples:\n  \
                     git diff origin/main... > pr.diff && vulngate pr.diff"
)]
struct Cli {
    /// Unified diff to scan
    diff_file: PathBuf,

    /// Path to configuration file (default: .vulngate.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, short)]
    verbose: bool,
}

fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            print!("{}", e.render());
            std::process::exit(USAGE_EXIT_CODE);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(explicit: Option<&Path>) -> Result<VulngateConfig, VulngateError> {
    let config = match explicit {
        Some(path) => VulngateConfig::from_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                VulngateConfig::from_file(default_path)?
            } else {
                VulngateConfig::default()
            }
        }
    };
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = parse_cli();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    let resolve_settings =
        || -> Result<Settings, VulngateError> { load_config(config_path)?.resolve_from_env() };

    let outcome =
        pipeline::scan_diff_file(&cli.diff_file, Path::new(RESULT_FILE), resolve_settings).await?;

    match &outcome {
        Outcome::EmptyDiff => println!("PASS (empty diff)"),
        Outcome::Classified {
            verdict,
            raw_output,
            ..
        } => {
            println!("Raw model output:");
            println!("{raw_output}");
            println!("Decision: {verdict}");
        }
    }

    std::process::exit(outcome.exit_code());
}
