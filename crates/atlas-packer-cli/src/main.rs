mod input;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use atlas_packer_core::{PackOutput, Packer, PackerConfig, to_json_array, to_json_hash};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use image::RgbaImage;
use serde::Deserialize;
use tracing::{info, warn};

use crate::input::PathFilter;

#[derive(Parser, Debug)]
#[command(
    name = "atlas-packer",
    about = "Pack a folder of images into texture atlas pages",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Draw a progress bar while decoding inputs
    #[arg(long, default_value_t = true, action = ArgAction::Set, global = true, help_heading = "Logging/UX")]
    progress: bool,
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Only log errors; also hides the progress bar
    #[arg(short, long, global = true, help_heading = "Logging/UX")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack images and write page PNGs plus JSON metadata
    Pack(PackArgs),
    /// Pack once and print page count, occupancy and elapsed time
    Bench(BenchArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MetadataFormat {
    /// Pages listing their frames
    #[value(alias = "json")]
    JsonArray,
    /// Frames keyed by name
    JsonHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ConfigFormat {
    Json,
    Yaml,
}

/// Layout and image processing flags shared by `pack` and `bench`.
#[derive(clap::Args, Debug, Clone)]
struct LayoutArgs {
    /// Largest page width and height in pixels
    #[arg(long, default_value_t = 8192, help_heading = "Layout")]
    max_page_size: u32,
    /// Free pixels kept right of and below every image
    #[arg(long, default_value_t = 1, help_heading = "Layout")]
    padding: u32,
    /// Round page sizes up to powers of two
    #[arg(long, help_heading = "Layout")]
    pow2: bool,
    /// Cut fully transparent borders before packing
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Images")]
    trim: bool,
    /// Store images with identical trimmed pixels once
    #[arg(long, help_heading = "Images")]
    combine_duplicates: bool,
    /// Composite pages on a thread pool (needs the `parallel` feature)
    #[arg(long, help_heading = "Images")]
    parallel: bool,
}

impl LayoutArgs {
    fn to_config(&self) -> PackerConfig {
        PackerConfig::builder()
            .max_page_size(self.max_page_size)
            .padding(self.padding)
            .pow2(self.pow2)
            .trim(self.trim)
            .combine_duplicates(self.combine_duplicates)
            .parallel(self.parallel)
            .build()
    }
}

#[derive(clap::Args, Debug, Clone)]
struct PackArgs {
    /// Image file or directory to pack
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Where pages and metadata are written
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Base file name: <name>.png (or <name>_<page>.png) and <name>.json
    #[arg(short, long, default_value = "atlas", help_heading = "Input/Output")]
    name: String,
    /// YAML file whose keys override the layout flags
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Only pack paths matching one of these globs
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Skip paths matching any of these globs
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    #[command(flatten)]
    layout: LayoutArgs,

    /// Metadata layout
    #[arg(long, value_enum, default_value_t = MetadataFormat::JsonArray, help_heading = "Export")]
    metadata: MetadataFormat,
    /// Also write packing statistics as JSON to this path
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the effective configuration and exit
    #[arg(long, help_heading = "Export")]
    print_config: bool,
    /// Format used by --print-config
    #[arg(long, value_enum, default_value_t = ConfigFormat::Json, help_heading = "Export")]
    print_config_format: ConfigFormat,
    /// Pack and report, but write nothing
    #[arg(long, help_heading = "Export")]
    dry_run: bool,
}

#[derive(clap::Args, Debug, Clone)]
struct BenchArgs {
    /// Image file or directory to pack
    input: PathBuf,
    #[command(flatten)]
    layout: LayoutArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet),
        Commands::Bench(args) => run_bench(args),
    }
}

fn run_pack(args: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let mut cfg = args.layout.to_config();
    if let Some(path) = &args.config {
        cfg = FileConfig::load(path)?.apply(cfg);
    }
    cfg.validate()?;

    if args.print_config {
        let text = match args.print_config_format {
            ConfigFormat::Json => serde_json::to_string_pretty(&cfg)?,
            ConfigFormat::Yaml => serde_yaml::to_string(&cfg)?,
        };
        println!("{}", text);
        return Ok(());
    }

    let filter = PathFilter::new(&args.include, &args.exclude)?;
    let paths = input::collect_paths(&args.input, &filter);
    let images = input::decode_all(&args.input, &paths, show_progress)?;
    if images.is_empty() {
        warn!(input = %args.input.display(), "no images found");
    }

    let out = pack_images(cfg.clone(), &images)?;
    let stats = out.stats();
    info!(
        pages = stats.num_pages,
        entries = stats.num_entries,
        duplicates = stats.num_duplicates,
        empty = stats.num_empty,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        "packed"
    );

    let metadata = match args.metadata {
        MetadataFormat::JsonArray => to_json_array(&out, &cfg),
        MetadataFormat::JsonHash => to_json_hash(&out, &cfg),
    };

    if args.dry_run {
        println!("{}", stats.summary());
        return Ok(());
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output directory {}", args.out_dir.display()))?;
    for (page, file) in out.pages.iter().zip(page_file_names(&args.name, &out)) {
        let path = args.out_dir.join(file);
        page.rgba
            .save(&path)
            .with_context(|| format!("write page {}", path.display()))?;
        info!(path = %path.display(), page = page.id, width = page.width, height = page.height, "page written");
    }

    let json_path = args.out_dir.join(format!("{}.json", args.name));
    fs::write(&json_path, serde_json::to_string_pretty(&metadata)?)
        .with_context(|| format!("write metadata {}", json_path.display()))?;
    info!(path = %json_path.display(), "metadata written");

    if let Some(stats_path) = &args.export_stats {
        fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
            .with_context(|| format!("write stats {}", stats_path.display()))?;
        info!(path = %stats_path.display(), "stats written");
    }
    Ok(())
}

fn run_bench(args: &BenchArgs) -> anyhow::Result<()> {
    let cfg = args.layout.to_config();
    cfg.validate()?;
    let paths = input::collect_paths(&args.input, &PathFilter::default());
    let images = input::decode_all(&args.input, &paths, false)?;

    let start = Instant::now();
    let out = pack_images(cfg, &images)?;
    let elapsed = start.elapsed();

    let stats = out.stats();
    println!(
        "images={} pages={} occupancy={:.2}% time={}",
        images.len(),
        stats.num_pages,
        stats.occupancy * 100.0,
        fmt_duration(elapsed)
    );
    Ok(())
}

fn pack_images(cfg: PackerConfig, images: &[(String, RgbaImage)]) -> anyhow::Result<PackOutput> {
    let mut packer = Packer::new(cfg);
    for (key, img) in images {
        packer
            .add_image(key.as_str(), img)
            .with_context(|| format!("add {}", key))?;
    }
    Ok(packer.pack()?)
}

fn fmt_duration(d: Duration) -> String {
    if d.as_millis() >= 1 {
        format!("{:.1}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{}us", d.as_micros())
    }
}

/// `<name>.png` for a single page, `<name>_<page>.png` otherwise.
fn page_file_names(name: &str, out: &PackOutput) -> Vec<String> {
    match out.pages.len() {
        1 => vec![format!("{}.png", name)],
        _ => out
            .pages
            .iter()
            .map(|p| format!("{}_{}.png", name, p.id))
            .collect(),
    }
}

fn init_tracing(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

/// Keys read from a `--config` YAML file. Absent keys keep the flag values.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    trim: Option<bool>,
    max_page_size: Option<u32>,
    padding: Option<u32>,
    power_of_two: Option<bool>,
    combine_duplicates: Option<bool>,
    parallel: Option<bool>,
}

impl FileConfig {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
    }

    fn apply(self, base: PackerConfig) -> PackerConfig {
        PackerConfig {
            trim: self.trim.unwrap_or(base.trim),
            max_page_size: self.max_page_size.unwrap_or(base.max_page_size),
            padding: self.padding.unwrap_or(base.padding),
            power_of_two: self.power_of_two.unwrap_or(base.power_of_two),
            combine_duplicates: self.combine_duplicates.unwrap_or(base.combine_duplicates),
            parallel: self.parallel.unwrap_or(base.parallel),
        }
    }
}
