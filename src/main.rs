use clap::Parser;
use std::path::PathBuf;

use pangolin::data;
use pangolin::defaults::{DEFAULT_MAX_AMBIG, DEFAULT_MIN_LENGTH};
use pangolin::qc::QcThresholds;
use pangolin::resources::Resources;
use pangolin::run::{run, RunSettings};

#[derive(Parser)]
#[command(name = "pangolin")]
#[command(about = "pangolin: Phylogenetic Assignment of Named Global Outbreak LINeages", long_about = None)]
#[command(version)]
struct Cli {
    /// Query fasta file of sequences to analyse
    #[arg(
        value_name = "QUERY",
        required_unless_present_any = ["pangolearn_version", "lineages_version"]
    )]
    query: Option<PathBuf>,

    /// Output directory (default: current working directory)
    #[arg(short = 'o', long, value_name = "DIR")]
    outdir: Option<PathBuf>,

    /// Optional output file name (default: lineage_report.csv)
    #[arg(long, value_name = "FILE")]
    outfile: Option<String>,

    /// Data directory minimally containing the trained model, or a fasta
    /// alignment and guide tree in legacy mode
    #[arg(short = 'd', long, value_name = "DIR")]
    data: Option<PathBuf>,

    /// Go through the motions but don't actually run
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Directory for temporary files (default: $TMPDIR)
    #[arg(long, value_name = "DIR")]
    tempdir: Option<PathBuf>,

    /// Output all intermediate files, for dev purposes
    #[arg(long)]
    no_temp: bool,

    /// Maximum proportion of Ns allowed to attempt assignment
    #[arg(long, value_name = "FLOAT", default_value_t = DEFAULT_MAX_AMBIG)]
    max_ambig: f64,

    /// Minimum query length allowed to attempt assignment
    #[arg(long, value_name = "INT", default_value_t = DEFAULT_MIN_LENGTH)]
    min_length: usize,

    /// Use the original phylogenetic assignment methods with a guide tree
    /// (significantly slower than the classifier)
    #[arg(long)]
    legacy: bool,

    /// Output a phylogeny for each query sequence placed in the guide
    /// tree; only meaningful together with --legacy
    #[arg(long)]
    write_tree: bool,

    /// Include the bleeding-edge putative lineage definitions in
    /// assignment
    #[arg(short = 'p', long)]
    include_putative: bool,

    /// Add the lineages metadata table to the engine config, for the
    /// web-app output
    #[arg(long)]
    panguilin: bool,

    /// Number of threads for the workflow engine
    #[arg(short = 't', long, value_name = "INT", default_value_t = 1)]
    threads: usize,

    /// Print lots of stuff to screen
    #[arg(long)]
    verbose: bool,

    /// Show the installed pangoLEARN data version and exit
    #[arg(long = "pangolearn-version")]
    pangolearn_version: bool,

    /// Show the installed lineages data version and exit
    #[arg(long = "lineages-version")]
    lineages_version: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    // Data-package version queries print and exit before anything else.
    if cli.pangolearn_version || cli.lineages_version {
        std::process::exit(print_data_versions(&cli));
    }

    let settings = RunSettings {
        // Safe: clap requires the query unless a version flag is present.
        query: cli.query.expect("query is required"),
        outdir: cli.outdir,
        outfile: cli.outfile,
        data_dir: cli.data,
        tempdir: cli.tempdir,
        no_temp: cli.no_temp,
        thresholds: QcThresholds {
            min_length: cli.min_length,
            max_ambig: cli.max_ambig,
        },
        threads: cli.threads,
        legacy: cli.legacy,
        include_putative: cli.include_putative,
        write_tree: cli.write_tree,
        panguilin: cli.panguilin,
        dry_run: cli.dry_run,
        verbose: cli.verbose,
    };

    match run(&settings) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn print_data_versions(cli: &Cli) -> i32 {
    let data_dir = match &cli.data {
        Some(dir) => dir.clone(),
        None => match Resources::locate() {
            Ok(resources) => resources.default_data_dir(),
            Err(e) => {
                log::error!("{}", e);
                return e.exit_code();
            }
        },
    };

    if cli.pangolearn_version {
        println!(
            "pangoLEARN {}",
            data::package_version(&data_dir, "pangoLEARN")
        );
    }
    if cli.lineages_version {
        println!("lineages {}", data::package_version(&data_dir, "lineages"));
    }
    0
}
