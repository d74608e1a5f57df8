//! Command-line entry point for DiffImg run set-up.
//!
//! Subcommands:
//! - `configure`: pick a pointing, select exposures and write the DAGMaker rc
//! - `postproc-ini`: write the post-processing configuration
//! - `exposure-info`: look up night, pointing and band for an exposure list
//! - `job-stats`: report DiffImg and ForcePhoto progress for an exposure list

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use diffimg_dag::config::AppConfig;
use diffimg_dag::db::{CatalogFactory, ExposureCatalog};
use diffimg_dag::io::read_id_list;
use diffimg_dag::logging::{self, OperationLog, DEFAULT_LOG_FILE};
use diffimg_dag::models::{Pointing, Season};
use diffimg_dag::render::{
    write_annotated_table, write_dag_rc, write_exposure_info, write_search_list, PostprocIni,
};
use diffimg_dag::selection::TimeWindow;
use diffimg_dag::services::{fetch_exposure_details, get_exposure_info, JobStatsScanner};

/// DiffImg end-to-end run set-up
#[derive(Parser, Debug)]
#[command(name = "diffimg-dag")]
#[command(about = "Prepare DiffImg DAG inputs and inspect run outputs")]
#[command(version)]
struct Args {
    /// TOML configuration file (defaults to diffimg.toml in the usual places)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// File the log is appended to
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Select exposures around a pointing and write the DAGMaker rc
    Configure {
        /// Pointing right ascension in degrees (random if omitted)
        #[arg(long, requires = "dec", allow_hyphen_values = true)]
        ra: Option<f64>,

        /// Pointing declination in degrees (random if omitted)
        #[arg(long, requires = "ra", allow_hyphen_values = true)]
        dec: Option<f64>,

        /// Seed for the random pointing
        #[arg(long)]
        seed: Option<u64>,

        /// Season code, YYMM (current month if omitted)
        #[arg(long)]
        season: Option<u32>,

        /// Output rc file
        #[arg(long, default_value = "dagmaker.rc")]
        outfile: PathBuf,

        /// Output list of search exposure ids
        #[arg(long, default_value = "search_exposures.list")]
        manifest: PathBuf,

        /// Output annotated exposure table
        #[arg(long, default_value = "exposures.csv")]
        table: PathBuf,
    },

    /// Write postproc_<season>.ini
    PostprocIni {
        #[arg(long)]
        season: u32,

        /// Trigger MJD
        #[arg(long)]
        recycler_mjd: f64,

        /// Proposal id, e.g. 2021B-0001
        #[arg(long)]
        propid: String,

        /// Exposure list file referenced by the ini
        #[arg(long)]
        exp_list: String,

        #[arg(long)]
        bands: String,

        /// Directory the ini is written to
        #[arg(long, default_value = ".")]
        outdir: PathBuf,
    },

    /// Write exposure, nite, radeg, decdeg and band for a list of exposure ids
    ExposureInfo {
        /// File with one exposure id per line
        #[arg(long)]
        exp_list: PathBuf,

        #[arg(long, default_value = "exp_list_full.list")]
        out: PathBuf,
    },

    /// Report DiffImg and ForcePhoto outputs for a list of exposure ids
    JobStats {
        #[arg(long)]
        season: u32,

        /// File with one exposure id per line
        #[arg(long)]
        exp_list: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::from_default_location().unwrap_or_else(|e| {
            debug!("{e}; using built-in defaults");
            AppConfig::default()
        }),
    };
    config.apply_env_overrides();
    Ok(config)
}

fn open_catalog(config: &AppConfig) -> Result<Arc<dyn ExposureCatalog>> {
    let catalog = CatalogFactory::create(config).context("Failed to open exposure catalog")?;
    Ok(catalog)
}

#[allow(clippy::too_many_arguments)]
async fn configure(
    config: &AppConfig,
    ra: Option<f64>,
    dec: Option<f64>,
    seed: Option<u64>,
    season: Option<u32>,
    outfile: &Path,
    manifest: &Path,
    table_path: &Path,
) -> Result<()> {
    let log = OperationLog::new("configure_dag");

    let season = season
        .map(Season::new)
        .unwrap_or_else(|| Season::from_date(Local::now().date_naive()));

    let pointing = match (ra, dec) {
        (Some(ra), Some(dec)) => Pointing { ra, dec },
        _ => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            Pointing::random(&mut rng)
        }
    };
    info!(parent: log.span(), %season, ra = pointing.ra, dec = pointing.dec, "Chose pointing");

    let catalog = open_catalog(config)?;
    let partition = get_exposure_info(catalog.as_ref(), pointing, &config.selection, &log).await?;
    if partition.outcome.is_degenerate() {
        warn!(
            parent: log.span(),
            exposures = partition.table.len(),
            "Fewer than two nights observed; every exposure is a search exposure"
        );
    }
    if partition.table.is_empty() {
        bail!(
            "No exposures passed the cuts around RA {:.5}, Dec {:.5}",
            pointing.ra,
            pointing.dec
        );
    }
    info!(parent: log.span(), outcome = ?partition.outcome, "get_exposure_info output");

    let window = TimeWindow::from_partition(&partition.table, &config.window, &log)?;

    let scope = log.begin("write_dag_rc");
    write_dag_rc(outfile, &config.dag, season, &window)?;
    let searched = write_search_list(manifest, &partition.table)?;
    write_annotated_table(table_path, &partition.table)?;
    scope.finish();

    println!(
        "Wrote {} ({} search, {} template exposures)",
        outfile.display(),
        searched,
        partition.table.len() - searched
    );
    debug!(parent: log.span(), "Program Completed.");
    Ok(())
}

async fn exposure_info(config: &AppConfig, exp_list: &Path, out: &Path) -> Result<()> {
    let log = OperationLog::new("get_full_exp_info");
    let ids = read_id_list(exp_list)?;
    let catalog = open_catalog(config)?;

    let records = fetch_exposure_details(catalog.as_ref(), &ids, &log).await?;
    write_exposure_info(out, &records)?;
    println!("Wrote {} exposures to {}", records.len(), out.display());
    Ok(())
}

async fn job_stats(config: &AppConfig, season: u32, exp_list: &Path, json: bool) -> Result<()> {
    let log = OperationLog::new("fetch_job_stats");
    let ids = read_id_list(exp_list)?;
    let catalog = open_catalog(config)?;

    let records = fetch_exposure_details(catalog.as_ref(), &ids, &log).await?;
    let exposures: Vec<_> = records.iter().map(|r| (r.exposure_id, r.night)).collect();
    let report = JobStatsScanner::new(&config.paths, Season::new(season)).scan(&exposures, &log)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(Some(&args.log_file))?;
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Configure {
            ra,
            dec,
            seed,
            season,
            outfile,
            manifest,
            table,
        } => configure(&config, ra, dec, seed, season, &outfile, &manifest, &table).await,
        Command::PostprocIni {
            season,
            recycler_mjd,
            propid,
            exp_list,
            bands,
            outdir,
        } => {
            let ini = PostprocIni {
                season: Season::new(season),
                propid,
                trigger_mjd: recycler_mjd,
                exposures_listfile: exp_list,
                bands,
            };
            let path = ini.write_to_dir(&outdir)?;
            info!(path = %path.display(), "Wrote post-processing config");
            println!("Wrote {}", path.display());
            Ok(())
        }
        Command::ExposureInfo { exp_list, out } => exposure_info(&config, &exp_list, &out).await,
        Command::JobStats {
            season,
            exp_list,
            json,
        } => job_stats(&config, season, &exp_list, json).await,
    }
}
