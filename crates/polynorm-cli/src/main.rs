use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use log::LevelFilter;
use polynorm_core::document::{buffers_from_json, coords_from_json, Document};
use polynorm_core::normalizer::NormalizeConfig;
use polynorm_core::{process_document, similarity, Error, VpTree};
use std::path::{Path, PathBuf};
use std::process;

/// Polynorm — polyline normalization CLI
///
/// Resample polylines to a fixed point count and map them onto their
/// smallest enclosing circle.
#[derive(Parser)]
#[command(name = "polynorm", version, about, long_about = None)]
struct Cli {
    /// Suppress all non-error output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize every line of a JSON document
    Process {
        /// Input JSON file
        input: PathBuf,
        /// Output JSON file (default: <input>_processed.<ext>)
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[command(flatten)]
        settings: Settings,
        /// Print a JSON summary instead of text
        #[arg(long)]
        json: bool,
    },

    /// Angular distance between two coordinate buffers
    Distance {
        /// First JSON file (flat array or object with `coords`)
        file_a: PathBuf,
        /// Second JSON file
        file_b: PathBuf,
    },

    /// Build a nearest-shape index from processed lines
    Index {
        /// Processed output, or an array of coordinate buffers
        input: PathBuf,
        /// Index file (default: <input>_vptree.<ext>)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Find the indexed shapes closest to a query buffer
    Nearest {
        /// Index file written by `index`
        index: PathBuf,
        /// Query JSON file (flat array or object with `coords`)
        query: PathBuf,
        /// Number of matches
        #[arg(short, default_value_t = 1)]
        k: usize,
    },

    /// Show version information
    Version,
}

/// Normalization settings; flags override values from `--config`
#[derive(Args)]
struct Settings {
    /// JSON file with `points`, `halfExtent` and `seed`
    #[arg(long)]
    config: Option<PathBuf>,
    /// Resampled point count
    #[arg(long)]
    points: Option<usize>,
    /// Radius of the enclosing circle after scaling
    #[arg(long)]
    half_extent: Option<f64>,
    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

impl Settings {
    fn resolve(&self) -> Result<NormalizeConfig, Error> {
        let mut config = match &self.config {
            Some(path) => NormalizeConfig::from_json(&read_file(path)?)?,
            None => NormalizeConfig::default(),
        };
        if let Some(points) = self.points {
            config.points = points;
        }
        if let Some(half_extent) = self.half_extent {
            config.half_extent = half_extent;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let exit_code = match cli.command {
        Commands::Process {
            input,
            output,
            settings,
            json,
        } => cmd_process(&input, output, &settings, json, cli.quiet),
        Commands::Distance { file_a, file_b } => cmd_distance(&file_a, &file_b, cli.quiet),
        Commands::Index { input, output } => cmd_index(&input, output, cli.quiet),
        Commands::Nearest { index, query, k } => cmd_nearest(&index, &query, k, cli.quiet),
        Commands::Version => {
            println!(
                "polynorm {} (polynorm-core {})",
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_VERSION")
            );
            0
        }
    };

    process::exit(exit_code);
}

fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        LevelFilter::Off
    } else if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

// ── Commands ──────────────────────────────────────────────

/// Exit 0 when every line was normalized, 1 when some lines failed
/// (output is still written), 2 on I/O, parse or config errors
fn cmd_process(
    input: &Path,
    output: Option<PathBuf>,
    settings: &Settings,
    json: bool,
    quiet: bool,
) -> i32 {
    let config = match settings.resolve() {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let document = match read_file(input).and_then(|text| Document::from_json(&text)) {
        Ok(d) => d,
        Err(e) => return fail(e),
    };
    let report = match process_document(&document, &config) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    let output = output.unwrap_or_else(|| default_output_path(input, "processed"));
    let written = report
        .to_json_pretty()
        .and_then(|text| write_file(&output, &text));
    if let Err(e) = written {
        return fail(e);
    }

    for failure in &report.failures {
        eprintln!(
            "{} line {}: {}",
            "error:".red().bold(),
            failure.index,
            failure.error
        );
    }

    if json {
        let summary = serde_json::json!({
            "processed": report.lines.len(),
            "failed": report.failures.len(),
            "output": output.display().to_string(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => return fail(e.into()),
        }
    } else if !quiet {
        println!(
            "{} processed {} line(s)",
            "✓".green().bold(),
            report.lines.len()
        );
        println!("{} saved to {}", "✓".green().bold(), output.display());
    }

    if report.is_complete() {
        0
    } else {
        1
    }
}

fn cmd_distance(file_a: &Path, file_b: &Path, quiet: bool) -> i32 {
    let load = |path: &Path| read_file(path).and_then(|text| coords_from_json(&text));
    let distance = load(file_a)
        .and_then(|a| load(file_b).map(|b| (a, b)))
        .and_then(|(a, b)| similarity::cos_distance(&a, &b));

    match distance {
        Ok(d) => {
            if quiet {
                println!("{}", d);
            } else {
                println!("distance: {:.6} rad ({:.3}°)", d, d.to_degrees());
            }
            0
        }
        Err(e) => fail(e),
    }
}

fn cmd_index(input: &Path, output: Option<PathBuf>, quiet: bool) -> i32 {
    let tree = match read_file(input)
        .and_then(|text| buffers_from_json(&text))
        .and_then(VpTree::build)
    {
        Ok(t) => t,
        Err(e) => return fail(e),
    };

    let output = output.unwrap_or_else(|| default_output_path(input, "vptree"));
    if let Err(e) = tree.to_json_pretty().and_then(|text| write_file(&output, &text)) {
        return fail(e);
    }

    if !quiet {
        println!("{} indexed {} line(s)", "✓".green().bold(), tree.len());
        println!("{} saved to {}", "✓".green().bold(), output.display());
    }
    0
}

fn cmd_nearest(index: &Path, query: &Path, k: usize, quiet: bool) -> i32 {
    let matches = read_file(index)
        .and_then(|text| VpTree::from_json(&text))
        .and_then(|tree| {
            let query = read_file(query).and_then(|text| coords_from_json(&text))?;
            tree.search(&query, k)
        });

    match matches {
        Ok(hits) => {
            for hit in hits {
                if quiet {
                    println!("{} {}", hit.index, hit.distance);
                } else {
                    println!("#{:<4} distance {:.6} rad", hit.index, hit.distance);
                }
            }
            0
        }
        Err(e) => fail(e),
    }
}

// ── Helpers ───────────────────────────────────────────────

/// `dir/name.json` → `dir/name_<suffix>.json`
fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    input.with_file_name(name)
}

fn read_file(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::InvalidInput(format!("cannot read {}: {}", path.display(), e)))
}

fn write_file(path: &Path, contents: &str) -> Result<(), Error> {
    std::fs::write(path, contents)
        .map_err(|e| Error::InvalidInput(format!("cannot write {}: {}", path.display(), e)))
}

fn fail(err: Error) -> i32 {
    eprintln!("{} {}", "error:".red().bold(), err);
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("data/strokes.json"), "processed"),
            PathBuf::from("data/strokes_processed.json")
        );
        assert_eq!(
            default_output_path(Path::new("strokes"), "vptree"),
            PathBuf::from("strokes_vptree")
        );
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
