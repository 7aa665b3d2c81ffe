use clap::{Parser, Subcommand};
use log::{LevelFilter, error, info};
use rust_mser::config::log_level_from_env;
use rust_mser::logger::init_with_level;
use rust_mser::tools::{grayscale_stats, load_grayscale, region_summary, save_grayscale};
use rust_mser::utils::regions::{RegionFilter, regions_to_label_image};
use rust_mser::{DetectorParams, GrayscaleImage, RegionDetector, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "msertool", version, about = "Grey-level component tree tools")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the component stack of an image and print its regions
    Detect {
        #[arg(long)]
        image: PathBuf,
        /// JSON file with detector parameters
        #[arg(long)]
        params: Option<PathBuf>,
        /// Print regions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the merge records produced while flooding an image
    History {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Write a label image with one grey value per region
    Labels {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Drop regions rejected by the default size/shape filter
        #[arg(long)]
        filter: bool,
    },
    /// Print grayscale statistics for an image
    Stats {
        #[arg(long)]
        image: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log_level_from_env().unwrap_or(LevelFilter::Info),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(err) = init_with_level(level) {
        eprintln!("failed to install logger: {err}");
    }

    let result = match cli.command {
        Command::Detect {
            image,
            params,
            json,
        } => detect_cmd(&image, params.as_deref(), json),
        Command::History { image, json } => history_cmd(&image, json),
        Command::Labels { image, out, filter } => labels_cmd(&image, &out, filter),
        Command::Stats { image } => stats_cmd(&image),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn load(path: &Path) -> Result<GrayscaleImage> {
    let img = load_grayscale(path)?;
    info!(
        "loaded {} ({}x{})",
        path.display(),
        img.columns(),
        img.rows()
    );
    Ok(img)
}

fn detect_cmd(image: &Path, params: Option<&Path>, json: bool) -> Result<()> {
    let params = match params {
        Some(path) => DetectorParams::from_json_file(path)?,
        None => DetectorParams::default(),
    };
    let img = load(image)?;

    let start = Instant::now();
    let regions = RegionDetector::with_params(params).detect(&img)?;
    info!("flood took {:.2?}", start.elapsed());

    let summary = region_summary(&regions);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Found {} regions", summary.len());
    for (i, r) in summary.iter().enumerate() {
        let centroid = r
            .centroid
            .map(|(row, col)| format!("({row:.1}, {col:.1})"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  region {}: level={} area={} extent={}x{} centroid={}",
            i, r.level, r.area, r.cols, r.rows, centroid
        );
    }
    Ok(())
}

fn history_cmd(image: &Path, json: bool) -> Result<()> {
    let img = load(image)?;
    let history = RegionDetector::with_params(DetectorParams {
        record_history: true,
        ..DetectorParams::default()
    })
    .detect_with_history(&img)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history.merges)?);
        return Ok(());
    }

    println!("{} merges", history.merges.len());
    for m in &history.merges {
        let seed = m
            .seed
            .map(|p| format!("({}, {})", p.row, p.col))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  level={} area={} seed={} flood_level={}",
            m.level, m.area, seed, m.flood_level
        );
    }
    Ok(())
}

fn labels_cmd(image: &Path, out: &Path, filter: bool) -> Result<()> {
    let img = load(image)?;
    let mut regions = RegionDetector::new().detect(&img)?;
    if filter {
        RegionFilter::default().apply(img.len(), &mut regions);
        info!("{} regions left after filtering", regions.len());
    }
    let labels = regions_to_label_image(img.rows(), img.columns(), &regions);
    save_grayscale(&labels, out)?;
    info!("wrote {}", out.display());
    Ok(())
}

fn stats_cmd(image: &Path) -> Result<()> {
    let img = load(image)?;
    let stats = grayscale_stats(img.as_bytes());
    println!("Image: {} ({}x{})", image.display(), img.columns(), img.rows());
    println!(
        "Grayscale range: {}-{}, average: {}, distinct levels: {}",
        stats.min, stats.max, stats.avg, stats.distinct_levels
    );
    Ok(())
}
