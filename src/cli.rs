use clap::{Args as ClapArgs, Parser, Subcommand};
use phone_catalog::{MergeConfig, ReportConfig, ReportFormat, DEFAULT_CATALOG_PATH};
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Report on and merge the smartphone catalog.")]
pub struct Args {
    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print counts by brand, category, and price range
    Report(ReportArgs),

    /// Merge candidate files into the catalog, skipping known ids
    Merge(MergeArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ReportArgs {
    /// Catalog file to read
    #[arg(long, default_value = DEFAULT_CATALOG_PATH)]
    pub catalog: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    pub fn into_config(self) -> ReportConfig {
        ReportConfig {
            catalog_path: self.catalog,
            format: if self.json {
                ReportFormat::Json
            } else {
                ReportFormat::Text
            },
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct MergeArgs {
    /// Catalog file to read and rewrite
    #[arg(long, default_value = DEFAULT_CATALOG_PATH)]
    pub catalog: PathBuf,

    /// Candidate file to merge (repeatable, merged in order); defaults to the
    /// assets/data candidate list
    #[arg(long = "candidate")]
    pub candidates: Vec<PathBuf>,

    /// Dry-run mode (catalog not written)
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl MergeArgs {
    pub fn into_config(self) -> MergeConfig {
        let defaults = MergeConfig::default();
        MergeConfig {
            catalog_path: self.catalog,
            candidate_paths: if self.candidates.is_empty() {
                defaults.candidate_paths
            } else {
                self.candidates
            },
            dry_run: self.dry_run,
        }
    }
}
