use chrono::Duration;
use std::path::PathBuf;
use std::sync::Arc;
use structopt::StructOpt;

use authwatch::config::Config;
use authwatch::detection::{BruteForceDetector, DetectionPipeline};
use authwatch::geolocation::{GeoEnricher, GeoIpService};
use authwatch::input;
use authwatch::output::{AlertWriter, OutputFormat};
use authwatch::ratelimit::LookupRateLimiter;

/// Brute-force login detector
#[derive(StructOpt, Debug)]
#[structopt(name = "authwatch", about = "Brute-force login detector with GeoIP enrichment")]
pub enum Cli {
    /// Run one detection pass over the configured log file
    Run {
        /// Path to configuration file
        #[structopt(short, long, default_value = "config.toml")]
        config: PathBuf,
        /// Print alerts to stdout instead of writing the output file
        #[structopt(long)]
        console: bool,
    },
    /// Generate a default configuration file
    Config {
        /// Output path for the configuration file
        #[structopt(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::from_args();

    match cli {
        Cli::Run { config, console } => {
            let config = if config.exists() {
                Config::from_file(&config)?
            } else {
                log::warn!("Config file not found, using defaults");
                let mut defaults = Config::default();
                defaults.apply_env_overrides();
                defaults
            };

            let alerts = run_detection(&config, console)?;
            println!(
                "Generated {} alert(s). See {}.",
                alerts,
                config.alert_output.display()
            );
        }
        Cli::Config { output } => {
            let config = Config::default();
            config.to_file(&output)?;
            println!("Default configuration written to: {:?}", output);
        }
    }

    Ok(())
}

/// Execute one batch detection run. Any error here is fatal: no alert
/// output is written unless the whole run succeeds.
fn run_detection(config: &Config, console: bool) -> Result<usize, Box<dyn std::error::Error>> {
    // The reader stays open for the whole run and closes on drop.
    let service = GeoIpService::new(&config.geoip_db_path)?;
    log::info!("Opened GeoIP database {}", config.geoip_db_path.display());

    let events = input::load_events(&config.log_file)?;

    let detector = BruteForceDetector::new(
        config.brute_force_threshold,
        Duration::minutes(config.brute_force_window_minutes),
    );
    let enricher = GeoEnricher::new(Arc::new(service), LookupRateLimiter::new(config.rate_limit));
    let mut pipeline = DetectionPipeline::new(detector, enricher);

    let alerts = pipeline.run(&events);

    let format = if console {
        OutputFormat::Console
    } else {
        OutputFormat::Json
    };
    AlertWriter::new(format, config.alert_output.clone()).write_alerts(&alerts)?;

    Ok(alerts.len())
}
