use anyhow::{Context, Result};
use clap::Parser;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use walkdir::WalkDir;

use std::path::{Path, PathBuf};

use pixelread::{DataType, DefaultReader, Reader, ReaderConfig};

#[derive(Parser)]
#[command(name = "pixelread")]
#[command(about = "Inspect image files as labelled n-dimensional arrays", long_about = None)]
#[command(version)]
struct Args {
    /// Input images or directories of images
    #[arg(value_name = "INPUT", required = true)]
    input: Vec<PathBuf>,

    /// Override the guessed dimension order (one label per axis, e.g. YXC)
    #[arg(long, value_name = "DIMS")]
    dims: Option<String>,

    /// Report the shape after rearranging axes into this order
    #[arg(long, value_name = "ORDER")]
    order: Option<String>,

    /// Default dimension order used for guessing
    #[arg(long, value_name = "ORDER")]
    default_order: Option<String>,

    /// Persist --default-order to the config file
    #[arg(long, default_value_t, requires = "default_order")]
    save_config: bool,

    /// Print one JSON object per image
    #[arg(long, default_value_t)]
    json: bool,

    /// Verbose output
    #[arg(short, long, default_value_t)]
    verbose: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, default_value_t)]
    quiet: bool,
}

#[derive(Debug, serde::Serialize)]
struct Summary {
    path: PathBuf,
    format: Option<String>,
    dtype: DataType,
    shape: Vec<usize>,
    dims: String,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} {} {:?} [{}]",
            self.path.display(),
            self.format.as_deref().unwrap_or("unknown"),
            self.dtype,
            self.shape,
            self.dims
        )
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose, args.quiet);

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let config = build_config(args)?;

    let files = find_files(&args.input)?;
    log::info!("Inspecting {} images", files.len());

    let results: Vec<_> = files
        .into_par_iter()
        .map(|path| {
            let summary = inspect(&path, &config, args);
            (path, summary)
        })
        .collect();

    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(summary) => println!("{}", render(&summary, args.json)?),
            Err(e) => {
                log::warn!("Failed to read {}: {:#}", path.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} images could not be read");
    }

    Ok(())
}

fn render(summary: &Summary, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string(summary)?)
    } else {
        Ok(summary.to_string())
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Error
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn build_config(args: &Args) -> Result<ReaderConfig> {
    let mut config = ReaderConfig::load().unwrap_or_default();

    if let Some(order) = &args.default_order {
        if order.is_empty() {
            anyhow::bail!("Default order must contain at least one label");
        }
        config.default_dimension_order = order.clone();
    }

    if args.save_config {
        let path = config.save().context("Failed to save config file")?;
        log::info!(
            "Saved default order {} to {}",
            config.default_dimension_order,
            path.display()
        );
    }

    Ok(config)
}

fn inspect(path: &Path, config: &ReaderConfig, args: &Args) -> Result<Summary> {
    let mut reader = DefaultReader::with_config(path, config)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    if let Some(dims) = &args.dims {
        reader.set_dims(dims)?;
    }

    let (shape, dims) = match &args.order {
        Some(order) => (reader.data_in_order(order)?.shape().to_vec(), order.clone()),
        None => (reader.shape()?.to_vec(), reader.dims()?.to_string()),
    };

    Ok(Summary {
        path: path.to_path_buf(),
        format: reader.format().map(|f| format!("{f:?}").to_lowercase()),
        dtype: reader.data()?.dtype(),
        shape,
        dims,
    })
}

fn find_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in inputs {
        if path.is_dir() {
            for entry in WalkDir::new(path).follow_links(true) {
                let entry = entry.context("Failed to walk input directory")?;
                if entry.file_type().is_file() && has_image_extension(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else if path.exists() {
            files.push(path.clone());
        } else {
            anyhow::bail!("Input file does not exist: {}", path.display());
        }
    }

    files.sort();
    Ok(files)
}

/// Helper function to check if a file has an image extension
fn has_image_extension(path: &Path) -> bool {
    static VALID_EXTENSIONS: &[&str] = &[
        "jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp", "pnm", "tga",
    ];
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| VALID_EXTENSIONS.contains(&ext.as_str()))
}
