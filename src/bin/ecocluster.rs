use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use log::{error, info, LevelFilter};
use ecocluster::{EcoclusterConfig, Result};
use ecocluster::report;

/// Cluster ecoregions by similarity of their climate time-series statistics.
#[derive(Debug, Parser)]
#[command(name = "ecocluster", version)]
struct Args {
    /// First year of the analysis period
    year_begin: Option<i32>,

    /// Last year of the analysis period
    year_end: Option<i32>,

    /// Directory holding the time-series inputs and receiving the report
    path: Option<PathBuf>,

    /// INI configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level: none, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    /// Skip the JSON summary
    #[arg(long)]
    no_summary: bool,
}

fn load_config(args: &Args) -> Result<EcoclusterConfig> {
    let mut config = match &args.config {
        Some(path) => EcoclusterConfig::from_ini(path)?,
        None => EcoclusterConfig::default(),
    };

    if let Some(year) = args.year_begin {
        config.files.year_begin = year;
    }
    if let Some(year) = args.year_end {
        config.files.year_end = year;
    }
    if let Some(path) = &args.path {
        config.files.analyses_dir = path.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging.set_level(level)?;
    }
    if args.no_summary {
        config.files.write_summary = false;
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(config: &EcoclusterConfig) -> Result<()> {
    let level = config.logging.get_log_level();
    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level);

    if let Some(dir) = &config.logging.log_dir {
        std::fs::create_dir_all(dir)?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("ecocluster_{}.log", timestamp)))?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }

    builder.init();
    Ok(())
}

fn run(config: &EcoclusterConfig) -> Result<()> {
    let start_time = Instant::now();
    info!("ecocluster started at {}", Local::now().to_rfc3339());
    info!("{}", config.clustering.describe());

    let input = ecocluster::load_timeseries_dir(
        &config.files.timeseries_dir(),
        config.clustering.label_variables,
    )?;
    let outcome = ecocluster::run(&input, &config.clustering)?;

    if !outcome.diagnostics.is_empty() {
        info!("{} non-fatal diagnostics recorded", outcome.diagnostics.len());
    }

    report::write_report(config.files.report_path(), &outcome.clusters)?;
    if config.files.write_summary {
        report::write_summary(config.files.summary_path(), &outcome)?;
    }

    info!("ecocluster completed at {} ({:.2?})", Local::now().to_rfc3339(), start_time.elapsed());
    Ok(())
}

fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = init_logging(&config) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    if let Err(e) = run(&config) {
        error!("ecocluster failed: {}", e);
        if config.logging.get_log_level() == LevelFilter::Off || config.logging.log_dir.is_some() {
            eprintln!("ecocluster failed: {}", e);
        }
        std::process::exit(1);
    }
}
