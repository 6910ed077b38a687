//! RideType - Cycling Ride Classifier
//!
//! Command-line entry point.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ridetype::batch::{ride_date_from_path, BatchClassifier, CsvFolder, FixedFtp, ResultSink};
use ridetype::metrics::analytics::{ClassificationResult, FtpProgression, RideClassifier};
use ridetype::metrics::zones::PowerZone;
use ridetype::recording::{import_csv_file, import_training_log, TextReport};
use ridetype::storage::config::{load_config, load_config_from};
use ridetype::storage::{AppConfig, ClassificationStore, Database, DatabaseError, FtpHistoryStore};

#[derive(Parser)]
#[command(name = "ridetype", version, about = "Classify cycling rides from power data")]
struct Cli {
    /// Config file (defaults to config.toml in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single ride CSV
    Classify {
        /// Ride CSV file
        file: PathBuf,
        /// FTP in watts; looked up in the FTP history when omitted
        #[arg(long)]
        ftp: Option<f64>,
        /// Database holding the FTP history
        #[arg(long)]
        db: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify every ride CSV under a folder
    Batch {
        /// Folder of ride CSV files named YYYY_MM_DD_HH_MM_SS.csv
        dir: Option<PathBuf>,
        /// Use one FTP for every ride instead of the FTP history
        #[arg(long)]
        ftp: Option<f64>,
        /// Database file
        #[arg(long)]
        db: Option<PathBuf>,
        /// Text report path
        #[arg(long)]
        output: Option<PathBuf>,
        /// Do not store classifications in the database
        #[arg(long)]
        no_db: bool,
    },
    /// Build the FTP history from training-log JSON exports
    ImportFtp {
        /// Training-log JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Database file
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("Failed to load configuration")?;

    tracing::debug!("Starting RideType v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Classify {
            file,
            ftp,
            db,
            json,
        } => classify(&config, &file, ftp, db, json),
        Commands::Batch {
            dir,
            ftp,
            db,
            output,
            no_db,
        } => batch(&config, dir, ftp, db, output, no_db),
        Commands::ImportFtp { files, db } => import_ftp(&config, &files, db),
    }
}

fn open_database(config: &AppConfig, db: Option<PathBuf>) -> Result<Database> {
    let path = db.unwrap_or_else(|| config.database_path());
    Database::open(&path).with_context(|| format!("Failed to open database {}", path.display()))
}

fn classify(
    config: &AppConfig,
    file: &Path,
    ftp: Option<f64>,
    db: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let ftp = match ftp {
        Some(ftp) => ftp,
        None => {
            let Some(date) = ride_date_from_path(file) else {
                bail!(
                    "No --ftp given and no ride date in file name {}",
                    file.display()
                );
            };
            let database = open_database(config, db)?;
            FtpHistoryStore::new(database.connection())
                .latest_ftp_at(date)?
                .with_context(|| format!("No FTP recorded on or before {}", date))?
        }
    };

    let series =
        import_csv_file(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let classifier = RideClassifier::with_settings(ftp, config.intervals)?;
    let result = classifier.classify(&series.samples)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result, ftp);
    }

    Ok(())
}

fn print_result(result: &ClassificationResult, ftp: f64) {
    println!("Ride type: {}", result.ride_type);
    println!("  {}", result.ride_type.description());
    println!("FTP: {:.0} W", ftp);
    println!("Duration: {:.1} min", result.duration_minutes);
    println!("Average power: {:.0} W", result.average_power);
    println!("Variability: {:.2}", result.variability);
    println!("Intervals: {}", result.intervals_detected());
    for (i, interval) in result.intervals.iter().enumerate() {
        println!(
            "  {:>2}. at {:>6.0}s for {:>4.0}s  avg {:>4.0} W  peak {:>4.0} W  {}",
            i + 1,
            interval.start_time,
            interval.duration,
            interval.avg_power,
            interval.peak_power,
            interval.zone.label()
        );
    }

    let total = result.zone_breakdown.total();
    println!("Time in zone:");
    for zone in PowerZone::ALL {
        let seconds = result.zone_breakdown.get(zone);
        let percent = if total > 0.0 {
            seconds / total * 100.0
        } else {
            0.0
        };
        println!(
            "  {:<20} {:>6.1} min  {:>5.1}%",
            zone.label(),
            seconds / 60.0,
            percent
        );
    }
}

fn batch(
    config: &AppConfig,
    dir: Option<PathBuf>,
    ftp: Option<f64>,
    db: Option<PathBuf>,
    output: Option<PathBuf>,
    no_db: bool,
) -> Result<()> {
    let folder = CsvFolder::new(dir.unwrap_or_else(|| config.batch.rides_dir.clone()));
    let mut report = TextReport::new(output.unwrap_or_else(|| config.batch.results_file.clone()));
    let write_database = config.batch.write_database && !no_db;

    if ftp.is_none() && no_db {
        bail!("--no-db needs --ftp, the FTP history lives in the database");
    }

    let database = if ftp.is_none() || write_database {
        Some(open_database(config, db)?)
    } else {
        None
    };

    let mut store = database
        .as_ref()
        .filter(|_| write_database)
        .map(|database| ClassificationStore::new(database.connection()));

    // Store first so a ride that fails to persist never reaches the report
    let mut sinks: Vec<&mut dyn ResultSink> = Vec::new();
    if let Some(store) = store.as_mut() {
        sinks.push(store);
    }
    sinks.push(&mut report);

    let classifier = BatchClassifier::with_settings(config.intervals);
    let summary = match (ftp, &database) {
        (Some(ftp), _) => classifier.run(&folder, &FixedFtp(ftp), &mut sinks)?,
        (None, Some(database)) => classifier.run(
            &folder,
            &FtpHistoryStore::new(database.connection()),
            &mut sinks,
        )?,
        (None, None) => bail!("No FTP source available"),
    };

    println!(
        "Processing complete: {} successful, {} failed",
        summary.successful, summary.failed
    );
    if !summary.ride_types.is_empty() {
        println!("Ride type summary:");
        for (label, count) in &summary.ride_types {
            println!("  {}: {}", label, count);
        }
    }

    Ok(())
}

fn import_ftp(config: &AppConfig, files: &[PathBuf], db: Option<PathBuf>) -> Result<()> {
    let mut database = open_database(config, db)?;
    let progression = FtpProgression::new();
    let mut total = 0;

    for file in files {
        let log = import_training_log(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let records = progression.compute(&log.activities);

        let tx = database.transaction()?;
        total += FtpHistoryStore::new(&tx).save_records(&log.athlete_id, &records)?;
        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        if let Some(latest) = records.last() {
            println!(
                "{}: {} activities, FTP {:.0} W as of {}",
                log.athlete_id,
                records.len(),
                latest.ftp,
                latest.activity_date.format("%Y-%m-%d")
            );
        }
    }

    println!("Stored {} FTP records", total);
    Ok(())
}
