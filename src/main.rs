use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thumbcache::{config, logging, output, process};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "thumbcache")]
#[command(about = "Batch thumbnailer with a content-addressed cache")]
#[command(long_about = "\
Batch thumbnailer with a content-addressed cache

Every recognized image in the source directory is scaled to cover a fixed
box (128x128 by default), center-cropped, and written to the output
directory as <sha256-of-source><extension>. Content that already has a
thumbnail is skipped, so repeated runs only pay for new images.

Layout:

  images/                  # source (--source)
  ├── a.png
  ├── b.png                # same bytes as a.png → shares its thumbnail
  └── resized/             # output (--output)
      └── 3a7bd3e2…b1c4.png

A file that cannot be read or decoded is reported and skipped; the run
continues with the rest.

Run 'thumbcache gen-config' to generate a documented thumbcache.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Source directory [default: images]
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Output directory [default: images/resized]
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Config file [default: ./thumbcache.toml if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Thumbnail every new image in the source directory
    Run {
        /// Print one JSON object per outcome instead of text
        #[arg(long)]
        json: bool,
    },
    /// Report which images are already cached without writing anything
    Check {
        /// Print the report as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Print a stock thumbcache.toml with all options documented
    GenConfig,
}

impl Cli {
    /// Load the config file and apply directory overrides from flags.
    fn resolve_config(&self) -> Result<config::Config, config::ConfigError> {
        let mut cfg = config::load_config(self.config.as_deref())?;
        if let Some(source) = &self.source {
            cfg.source_dir = source.clone();
        }
        if let Some(output) = &self.output {
            cfg.output_dir = output.clone();
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    match cli.command {
        Command::Run { json } => {
            let cfg = cli.resolve_config()?;
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    match (&event, json) {
                        (process::ProcessEvent::Finished { result, .. }, true) => {
                            match output::format_outcome_json(result) {
                                Ok(line) => println!("{}", line),
                                Err(e) => tracing::error!(error = %e, "failed to serialize outcome"),
                            }
                        }
                        (_, true) => {}
                        (_, false) => output::print_process_event(&event),
                    }
                }
            });
            let result = process::run(&cfg, Some(tx));
            printer
                .join()
                .map_err(|_| "output thread panicked")?;
            let summary = result?;
            if json {
                println!("{}", output::format_stats_json(&summary.stats)?);
            } else {
                println!("{}", output::format_run_summary(&summary.stats));
            }
        }
        Command::Check { json } => {
            let cfg = cli.resolve_config()?;
            let entries = process::check(&cfg)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                output::print_check_output(&entries);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
