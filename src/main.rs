use argo::config::{self, BackendKind};
use argo::convert::{self, ConvertEvent, Summary};
use argo::imaging::{ImageMagickBackend, NativeBackend};
use argo::output;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "argo")]
#[command(about = "Batch-convert a folder of JPEGs into resized variants")]
#[command(long_about = "\
Batch-convert a folder of JPEGs into resized variants

Every .jpg in InputFolder is written once per variant to OutputFolder as
<name><suffix>.jpg, resized to the variant width and recompressed at the
variant quality. Sizes relative to the original are reported as it goes.

Minimal config:

  InputFolder = \"originals\"
  OutputFolder = \"resized\"
  Suffixes = [\"-large\", \"-small\"]
  Widths = [2048, 512]
  Qualities = [85, 70]

Run 'argo --gen-config' for every option with explanations.")]
#[command(version = env!("ARGO_VERSION"))]
struct Cli {
    /// Path to the TOML config file
    #[arg(required_unless_present = "gen_config")]
    config: Option<PathBuf>,

    /// Print a documented sample config and exit
    #[arg(long)]
    gen_config: bool,

    /// Log debug details to stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

/// Log filter used when `RUST_LOG` is not set.
fn default_filter(verbose: bool) -> &'static str {
    if verbose { "argo=debug" } else { "argo=info" }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(config_path: &std::path::Path) -> Result<Summary, Box<dyn std::error::Error>> {
    let config = config::load_config(config_path)?;
    let color = output::color_enabled();
    let report = move |event: ConvertEvent| output::print_event(&event, color);

    let summary = match config.backend {
        BackendKind::Native => convert::convert_directory(&NativeBackend::new(), &config, report)?,
        BackendKind::ImageMagick => {
            convert::convert_directory(&ImageMagickBackend::new(), &config, report)?
        }
    };
    output::print_summary(&summary, color);
    Ok(summary)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return ExitCode::SUCCESS;
    }

    let Some(config_path) = cli.config else {
        error!("No config file provided");
        return ExitCode::FAILURE;
    };

    match run(&config_path) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
