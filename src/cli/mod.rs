//! Command-line interface for the pressure pipeline.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

use crate::core::loaders::{load_series_or_empty, PressureSeries};
use crate::core::transforms::SmoothingLevel;
use crate::processors::{combine, impulse};
use crate::visualization;
use crate::PipelineConfig;

#[derive(Parser)]
#[command(name = "pressure-pipeline")]
#[command(about = "Wall-impulse post-processing pipeline", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert impulse_<id>.csv files into bucketed pressure_<id>.csv files
    Process {
        /// Slit parameter L used to compute the per-wall divisors
        l: f64,
        /// Directory containing impulse CSV files
        #[arg(long, default_value = ".")]
        input_dir: PathBuf,
        /// Output directory for pressure files (defaults to the input directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Sum two pressure series key-wise into a combined series file
    Combine {
        /// Explicit input pair and output: A B OUT (omit to run the
        /// standard 0+1 and 2+3 pairings)
        #[arg(num_args = 3, value_names = ["A", "B", "OUT"])]
        files: Vec<PathBuf>,
        /// Directory for the standard pairings when no files are given
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Render pressure series to a smoothed comparison plot (PNG)
    Plot {
        /// Pressure series files to plot
        #[arg(default_values_os_t = default_plot_files())]
        files: Vec<PathBuf>,
        /// Smoothing level (defaults to the config value)
        #[arg(short, long)]
        smooth: Option<SmoothingLevel>,
        /// Output PNG file path
        #[arg(short, long, default_value = "combined_wave.png")]
        output: PathBuf,
    },
}

fn default_plot_files() -> Vec<PathBuf> {
    vec![
        PathBuf::from("pressure_01.csv"),
        PathBuf::from("pressure_23.csv"),
    ]
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<62} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.len() > 39 {
            format!("{}...", &value[..36])
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<39} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => match PipelineConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}, using defaults",
                    path.display(),
                    e
                );
                PipelineConfig::default()
            }
        },
        None => PipelineConfig::default(),
    };

    // Dispatch to subcommands
    match cli.command {
        Commands::Process {
            l,
            input_dir,
            output_dir,
        } => {
            cmd_process(l, &input_dir, output_dir, &config);
        }
        Commands::Combine { files, dir } => {
            cmd_combine(&files, &dir);
        }
        Commands::Plot {
            files,
            smooth,
            output,
        } => {
            cmd_plot(&files, smooth, &output, &config);
        }
    }
}

fn cmd_process(l: f64, input_dir: &PathBuf, output_dir: Option<PathBuf>, config: &PipelineConfig) {
    let start = Instant::now();

    let effective_output_dir = output_dir.unwrap_or_else(|| input_dir.clone());

    println!("Processing impulse files...");
    println!("Input directory: {}", input_dir.display());
    println!("Output directory: {}", effective_output_dir.display());
    println!("L: {}", l);

    let spinner = create_spinner("Bucketing impulse samples...");

    match impulse::process_directory(input_dir, &effective_output_dir, l, &config.geometry) {
        Ok(results) => {
            spinner.finish_and_clear();

            let total_buckets: usize = results.iter().map(|r| r.buckets).sum();
            let outputs: Vec<String> = results
                .iter()
                .map(|r| r.output.display().to_string())
                .collect();

            print_summary(
                "Impulse Processing Complete",
                &[
                    ("Input directory", input_dir.display().to_string()),
                    ("L", l.to_string()),
                    ("Files processed", results.len().to_string()),
                    ("Total buckets", total_buckets.to_string()),
                    ("Outputs", outputs.join(", ")),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Processing failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_combine(files: &[PathBuf], dir: &PathBuf) {
    let start = Instant::now();

    let outcome = if files.len() == 3 {
        println!("Combining {} + {}", files[0].display(), files[1].display());
        combine::combine_pair(&files[0], &files[1], &files[2])
            .map(|series| vec![(files[2].clone(), series.len())])
    } else {
        println!("Combining standard wall pairings in {}", dir.display());
        combine::combine_default_pairs(dir)
    };

    match outcome {
        Ok(results) => {
            let outputs: Vec<String> = results
                .iter()
                .map(|(path, seconds)| format!("{} ({} s)", path.display(), seconds))
                .collect();

            print_summary(
                "Combine Complete",
                &[
                    ("Pairs combined", results.len().to_string()),
                    ("Outputs", outputs.join(", ")),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            error!("Combine failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_plot(
    files: &[PathBuf],
    smooth: Option<SmoothingLevel>,
    output: &PathBuf,
    config: &PipelineConfig,
) {
    let start = Instant::now();

    let level = smooth.unwrap_or(config.smoothing.default_level);

    println!("Rendering comparison plot...");
    println!("Output: {}", output.display());
    println!("Smoothing: {:?}", level);

    // Pair each file with its configured label (or a generic fallback)
    let mut series: Vec<(String, PressureSeries)> = Vec::with_capacity(files.len());
    for (i, path) in files.iter().enumerate() {
        let label = config
            .plot
            .series_labels
            .get(i)
            .cloned()
            .unwrap_or_else(|| format!("Series {}", i + 1));

        match load_series_or_empty(path) {
            Ok(s) => {
                if s.is_empty() {
                    warn!("no data in {}, skipping", path.display());
                    continue;
                }
                info!("{}: {} ({} buckets)", label, path.display(), s.len());
                series.push((label, s));
            }
            Err(e) => {
                warn!("failed to read {}: {}, skipping", path.display(), e);
            }
        }
    }

    let spinner = create_spinner("Drawing series...");

    match visualization::plot_series(output, &series, level, &config.plot) {
        Ok(()) => {
            spinner.finish_and_clear();

            print_summary(
                "Plot Complete",
                &[
                    ("Output PNG", output.display().to_string()),
                    ("Series plotted", series.len().to_string()),
                    ("Smoothing", format!("{:?}", level).to_lowercase()),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Plot failed: {}", e);
            std::process::exit(1);
        }
    }
}
