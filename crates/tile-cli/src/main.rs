//! Tile Catalog CLI
//!
//! Command-line tool for checking texture tile directories against a
//! reference catalog.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tile_core::{
    scan_directory, AlternateLevel, Catalog, FileGrid, FsImageSource, GridReport, Resolution,
    Resolver, ScanEvent, ScanOptions, ScanReport,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tile-cli")]
#[command(about = "Texture tile catalog checker", long_about = None)]
#[command(version)]
struct Cli {
    /// Log every file tested and show directories in duplicate warnings
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ScanArgs {
    /// Catalog file (JSON)
    #[arg(short, long)]
    catalog: PathBuf,

    /// Tile directories to scan, in precedence order
    #[arg(short, long, required = true)]
    dir: Vec<PathBuf>,

    /// Name matching level: 0 exact, 1 alternates, 2 aliases
    #[arg(short, long, default_value_t = 1)]
    alternate: u8,

    /// Warn about files that are not recognized
    #[arg(short, long)]
    warn_unused: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan directories and summarize the tiles found
    Scan {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// List catalog tiles with no file in a category
    Missing {
        #[command(flatten)]
        scan: ScanArgs,

        /// Category suffix (empty for the base category)
        #[arg(long, default_value = "")]
        category: String,
    },

    /// Show how filenames resolve, without touching the filesystem
    Resolve {
        /// Catalog file (JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Name matching level: 0 exact, 1 alternates, 2 aliases
        #[arg(short, long, default_value_t = 1)]
        alternate: u8,

        /// Filenames to resolve
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Export the grid to a file
    Export {
        #[command(flatten)]
        scan: ScanArgs,

        /// Output format (csv or json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Level used when RUST_LOG is unset, or always when verbose
fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn init_logging(verbose: bool) {
    let level = default_log_level(verbose);
    let filter = if verbose {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> tile_core::Result<()> {
    let verbose = cli.verbose;

    match cli.command {
        Commands::Scan { scan } => cmd_scan(&scan, verbose),
        Commands::Missing { scan, category } => cmd_missing(&scan, &category, verbose),
        Commands::Resolve {
            catalog,
            alternate,
            names,
        } => cmd_resolve(&catalog, alternate, &names),
        Commands::Export {
            scan,
            format,
            output,
        } => cmd_export(&scan, &format, &output, verbose),
    }
}

/// Scan every directory into one grid
fn scan_all(
    args: &ScanArgs,
    catalog: Catalog,
    verbose: bool,
) -> tile_core::Result<(Resolver, FileGrid, Vec<ScanReport>)> {
    let mut grid = FileGrid::for_catalog(&catalog);
    let resolver = Resolver::new(catalog);

    let options = ScanOptions {
        verbose,
        alternate: AlternateLevel::from_level(args.alternate),
        warn_unused: args.warn_unused,
    };

    let mut reports = Vec::new();
    for dir in &args.dir {
        reports.push(scan_directory(&mut grid, &resolver, &FsImageSource, dir, &options)?);
    }

    Ok((resolver, grid, reports))
}

fn cmd_scan(args: &ScanArgs, verbose: bool) -> tile_core::Result<()> {
    let catalog = Catalog::load(&args.catalog)?;
    let (resolver, grid, reports) = scan_all(args, catalog, verbose)?;
    let catalog = resolver.catalog();

    println!("Scanned {} director(ies):", reports.len());
    for report in &reports {
        println!(
            "  {}: {} accepted, {} ignored, {} unrecognized, {} duplicates",
            report.path.display(),
            report.accepted,
            report.ignored(),
            report.unrecognized(),
            report.duplicates()
        );
        if verbose {
            for event in &report.events {
                if let ScanEvent::Duplicate {
                    filename,
                    existing_filename,
                    same_directory,
                    ..
                } = event
                {
                    let place = if *same_directory {
                        "same directory"
                    } else {
                        "earlier directory"
                    };
                    println!("    {} duplicates {} ({})", filename, existing_filename, place);
                }
            }
        }
    }
    println!();
    println!(
        "Found {} files for {} tiles in {} categories",
        grid.file_count(),
        catalog.total_tiles(),
        catalog.total_categories()
    );

    for (category, count) in grid.category_counts().iter().enumerate() {
        let suffix = catalog.category_suffix(category).unwrap_or("");
        let label = if suffix.is_empty() { "[base]" } else { suffix };
        println!("  {:<12} {}/{}", label, count, catalog.total_tiles());
    }

    Ok(())
}

fn cmd_missing(args: &ScanArgs, suffix: &str, verbose: bool) -> tile_core::Result<()> {
    let catalog = Catalog::load(&args.catalog)?;
    let category = catalog.category_index(suffix)?;

    let (resolver, grid, _) = scan_all(args, catalog, verbose)?;
    let catalog = resolver.catalog();

    let missing = grid.missing(category);
    println!("Missing tiles ({}):", missing.len());
    for tile in missing {
        println!("  {}{}", catalog.tile_name(tile).unwrap_or("?"), suffix);
    }

    Ok(())
}

fn cmd_resolve(catalog_path: &Path, alternate: u8, names: &[String]) -> tile_core::Result<()> {
    let resolver = Resolver::new(Catalog::load(catalog_path)?);
    let level = AlternateLevel::from_level(alternate);
    let catalog = resolver.catalog();

    for name in names {
        match resolver.resolve(name, level) {
            Resolution::Found {
                category,
                index,
                flat_index,
                root_name,
            } => {
                println!(
                    "{}: tile '{}' (#{}), category '{}' (#{}), root '{}', cell {}",
                    name,
                    catalog.tile_name(index).unwrap_or("?"),
                    index,
                    catalog.category_suffix(category).unwrap_or(""),
                    category,
                    root_name,
                    flat_index
                );
            }
            Resolution::Ignored { root_name } => {
                println!("{}: ignored (root '{}')", name, root_name);
            }
            Resolution::NotFound => println!("{}: not recognized", name),
        }
    }

    Ok(())
}

fn cmd_export(
    args: &ScanArgs,
    format: &str,
    output: &Path,
    verbose: bool,
) -> tile_core::Result<()> {
    let catalog = Catalog::load(&args.catalog)?;
    let (resolver, grid, _) = scan_all(args, catalog, verbose)?;
    let report = GridReport::build(&grid, resolver.catalog());

    match format.to_lowercase().as_str() {
        "csv" => report.save(output, false)?,
        "json" => report.save(output, true)?,
        _ => {
            eprintln!("Unknown format: {}. Supported formats: csv, json", format);
            std::process::exit(1);
        }
    }

    println!("Exported {} files to {}", report.file_count, output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level_shows_scan_totals() {
        assert_eq!(default_log_level(false), "info");
        assert_eq!(default_log_level(true), "debug");
    }

    #[test]
    fn test_missing_category_flag() {
        let cli = Cli::try_parse_from([
            "tile-cli", "missing", "--catalog", "c.json", "--dir", "tiles", "--category", "_n",
        ])
        .unwrap();
        assert!(matches!(&cli.command, Commands::Missing { category, .. } if category == "_n"));
    }
}
