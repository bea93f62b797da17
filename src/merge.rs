// 🔀 Catalog Merge - Union candidate files into the catalog
// At most one record per identifier; duplicates never update existing records

use crate::catalog::{load_candidates, Catalog, Phone, PhoneId};
use crate::error::CatalogError;
use crate::report::DEFAULT_CATALOG_PATH;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Candidate files merged when none are configured, in merge order
pub const DEFAULT_CANDIDATE_PATHS: [&str; 5] = [
    "assets/data/new_smartphones.json",
    "assets/data/more_smartphones.json",
    "assets/data/remaining_smartphones.json",
    "assets/data/final_smartphones.json",
    "assets/data/extra_2jutaan.json",
];

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Catalog to read and rewrite
    pub catalog_path: PathBuf,

    /// Candidate files, merged in this order; missing files are skipped
    pub candidate_paths: Vec<PathBuf>,

    /// Run the merge and print the log without rewriting the catalog
    pub dry_run: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            candidate_paths: DEFAULT_CANDIDATE_PATHS.iter().map(PathBuf::from).collect(),
            dry_run: false,
        }
    }
}

// ============================================================================
// MERGE RESULT
// ============================================================================

/// Phones read from one candidate file
#[derive(Debug, Clone)]
pub struct CandidateBatch {
    pub path: PathBuf,
    pub phones: Vec<Phone>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MergeAction {
    Added,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeDecision {
    pub id: PhoneId,
    pub name: String,
    pub action: MergeAction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeOutcome {
    /// One entry per candidate, in candidate order
    pub decisions: Vec<MergeDecision>,
    pub added_count: usize,
    pub skipped_count: usize,
    /// Catalog size after the merge
    pub total: usize,
}

// ============================================================================
// MERGE
// ============================================================================

/// Read every existing candidate file, in order.
///
/// All files are parsed before anything is merged, so one malformed file
/// fails the run while the catalog is still untouched.
pub fn load_batches(paths: &[PathBuf]) -> Result<Vec<CandidateBatch>, CatalogError> {
    let mut batches = Vec::new();

    for path in paths {
        match load_candidates(path)? {
            Some(phones) => {
                tracing::debug!(path = %path.display(), phones = phones.len(), "candidate file loaded");
                batches.push(CandidateBatch {
                    path: path.clone(),
                    phones,
                });
            }
            None => {
                tracing::debug!(path = %path.display(), "candidate file missing, skipping");
            }
        }
    }

    Ok(batches)
}

/// Append each candidate whose id is not yet present.
///
/// The id set grows as phones are added, so a repeat later in the same run
/// (same file or a later one) is skipped too.
pub fn merge_phones<I>(catalog: &mut Catalog, candidates: I) -> MergeOutcome
where
    I: IntoIterator<Item = Phone>,
{
    let mut known_ids = catalog.ids();
    let mut outcome = MergeOutcome::default();

    for phone in candidates {
        let action = if known_ids.insert(phone.id().clone()) {
            outcome.added_count += 1;
            MergeAction::Added
        } else {
            outcome.skipped_count += 1;
            MergeAction::Skipped
        };

        outcome.decisions.push(MergeDecision {
            id: phone.id().clone(),
            name: phone.name().to_string(),
            action,
        });

        if action == MergeAction::Added {
            catalog.smartphones.push(phone);
        }
    }

    outcome.total = catalog.len();
    outcome
}

/// Full merge run: load, dedup, log, rewrite.
pub fn run<W: Write>(config: &MergeConfig, out: &mut W) -> Result<MergeOutcome> {
    let mut catalog = Catalog::load(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog: {}", config.catalog_path.display()))?;

    let batches = load_batches(&config.candidate_paths).context("Failed to load candidate files")?;

    for batch in &batches {
        writeln!(
            out,
            "Loaded {} phones from {}",
            batch.phones.len(),
            batch.path.display()
        )?;
    }

    let initial_total = catalog.len();
    let candidates = batches.into_iter().flat_map(|batch| batch.phones);
    let outcome = merge_phones(&mut catalog, candidates);

    for decision in &outcome.decisions {
        match decision.action {
            MergeAction::Added => writeln!(out, "Added: {}", decision.name)?,
            MergeAction::Skipped => writeln!(out, "Skipped (already exists): {}", decision.name)?,
        }
    }

    if config.dry_run {
        writeln!(out, "\nDry run: {} not written", config.catalog_path.display())?;
    } else {
        catalog
            .save(&config.catalog_path)
            .context("Failed to write merged catalog")?;
        tracing::info!(
            path = %config.catalog_path.display(),
            before = initial_total,
            after = outcome.total,
            "catalog rewritten"
        );
    }

    writeln!(out, "\nSuccessfully added {} new smartphones!", outcome.added_count)?;
    writeln!(out, "Total smartphones: {}", outcome.total)?;

    Ok(outcome)
}

// ============================================================================
// TESTS
// ============================================================================
