use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use window_harvest::{catalog, config, output, scan};

const DEFAULT_CONFIG: &str = "config.toml";

#[derive(Parser)]
#[command(name = "window-harvest")]
#[command(version)]
#[command(about = "Recover capture dates and keywords from the head of JPEG files")]
#[command(long_about = "\
Recover capture dates and keywords from the head of JPEG files

Only the leading window of each file is read (256 KiB by default). The
EXIF DateTimeOriginal and the XMP dc:subject / lr:hierarchicalSubject
keywords are recovered when they fall inside it; anything past the window
is reported as absent rather than as an error.

Catalog records:
  id         image file stem (NHQ20260109_0001.jpg → NHQ20260109_0001)
  title      sidecar .txt → file stem with _ and - as spaces
  id_date    YYYYMMDD after the configured id prefix, else empty
  full_url   url_template with {id} filled, ~orig variant
  large_url  same, ~large variant

Run 'window-harvest gen-config' to generate a documented config.toml.")]
struct Cli {
    /// Config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the date and keywords recovered from one image
    Extract {
        /// JPEG file
        file: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Harvest a directory of images into a JSON catalog
    Catalog {
        /// JPEG file or directory to walk
        path: PathBuf,
        /// Catalog file to write
        #[arg(long, default_value = "gallery.json")]
        out: PathBuf,
    },
    /// Harvest a directory and list the records without writing anything
    Check {
        /// JPEG file or directory to walk
        path: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config_path = resolve_config_path(cli.config.as_deref());

    match cli.command {
        Command::Extract { file, json } => {
            let config = config::load_config(config_path.as_deref())?;
            let result = scan::extract_file(&file, config.window_bytes)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                output::print_extraction(&file, &result);
            }
        }
        Command::Catalog { path, out } => {
            let config = config::load_config(config_path.as_deref())?;
            init_thread_pool(&config.processing);
            let paths = scan::collect_jpegs(&path)?;
            println!("==> Harvesting {} images from {}", paths.len(), path.display());
            let report = scan::harvest(&paths, &config);
            let records = catalog::finalize(report.records);
            output::print_records(&records, &report.failures);
            catalog::write_catalog(&out, &records)?;
            println!("==> Catalog written: {}", out.display());
        }
        Command::Check { path } => {
            let config = config::load_config(config_path.as_deref())?;
            init_thread_pool(&config.processing);
            let paths = scan::collect_jpegs(&path)?;
            println!("==> Checking {}", path.display());
            let report = scan::harvest(&paths, &config);
            let records = catalog::finalize(report.records);
            output::print_records(&records, &report.failures);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// An explicit `--config` wins; otherwise use `./config.toml` if it exists.
fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = Path::new(DEFAULT_CONFIG);
            default.exists().then(|| default.to_path_buf())
        }
    }
}

/// Size the global rayon pool that `scan::harvest` fans out on.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        Ok(()) => log::debug!("Harvesting on {threads} threads"),
        Err(e) => log::debug!("Keeping existing thread pool: {e}"),
    }
}
