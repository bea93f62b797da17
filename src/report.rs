// 📊 Catalog Report - Counts by brand, category, and price range
// Read-only: loads the catalog and prints grouped tallies

use crate::catalog::Catalog;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

/// Default catalog location, relative to the working directory
pub const DEFAULT_CATALOG_PATH: &str = "assets/data/smartphones.json";

// ============================================================================
// PRICE BRACKETS
// ============================================================================

/// Inclusive upper bound on price, used only for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBracket {
    pub label: &'static str,
    pub upper_bound: i64,
}

/// Evaluated in order; a phone lands in the first bracket whose bound it does
/// not exceed. Anything above the last bound is left out.
pub const PRICE_BRACKETS: [PriceBracket; 3] = [
    PriceBracket {
        label: "≤2,000,000",
        upper_bound: 2_000_000,
    },
    PriceBracket {
        label: "≤3,000,000",
        upper_bound: 3_000_000,
    },
    PriceBracket {
        label: "≤4,000,000",
        upper_bound: 4_000_000,
    },
];

/// Index of the bracket a price falls into
pub fn bracket_for(price: f64) -> Option<usize> {
    PRICE_BRACKETS
        .iter()
        .position(|b| price <= b.upper_bound as f64)
}

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketCount {
    pub label: String,
    pub upper_bound: i64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogReport {
    pub total: usize,
    pub brands: BTreeMap<String, usize>,
    pub categories: BTreeMap<String, usize>,
    pub price_ranges: Vec<BracketCount>,
}

impl CatalogReport {
    /// Tally a catalog in one pass
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut brands = BTreeMap::new();
        let mut categories = BTreeMap::new();
        let mut bracket_counts = [0usize; PRICE_BRACKETS.len()];

        for phone in &catalog.smartphones {
            *brands.entry(phone.brand().to_string()).or_insert(0) += 1;

            for category in phone.categories() {
                *categories.entry(category.clone()).or_insert(0) += 1;
            }

            if let Some(i) = bracket_for(phone.price()) {
                bracket_counts[i] += 1;
            }
        }

        let price_ranges = PRICE_BRACKETS
            .iter()
            .zip(bracket_counts)
            .map(|(bracket, count)| BracketCount {
                label: bracket.label.to_string(),
                upper_bound: bracket.upper_bound,
                count,
            })
            .collect();

        CatalogReport {
            total: catalog.len(),
            brands,
            categories,
            price_ranges,
        }
    }

    /// Human-readable layout: a label per grouping, then indented `key: count` lines
    pub fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "Total smartphones: {}", self.total)?;
        writeln!(out)?;

        writeln!(out, "Brands:")?;
        for (brand, count) in &self.brands {
            writeln!(out, "  {}: {}", brand, count)?;
        }
        writeln!(out)?;

        writeln!(out, "Categories:")?;
        for (category, count) in &self.categories {
            writeln!(out, "  {}: {}", category, count)?;
        }
        writeln!(out)?;

        writeln!(out, "Price Ranges:")?;
        for range in &self.price_ranges {
            writeln!(out, "  {}: {}", range.label, range.count)?;
        }

        Ok(())
    }
}

// ============================================================================
// COMMAND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub catalog_path: PathBuf,
    pub format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            format: ReportFormat::Text,
        }
    }
}

/// Load the catalog and print the report. Nothing is printed if loading fails.
pub fn run<W: Write>(config: &ReportConfig, out: &mut W) -> Result<CatalogReport> {
    let catalog = Catalog::load(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog: {}", config.catalog_path.display()))?;

    tracing::debug!(
        path = %config.catalog_path.display(),
        phones = catalog.len(),
        "catalog loaded"
    );

    let report = CatalogReport::from_catalog(&catalog);

    match config.format {
        ReportFormat::Text => report.render(out)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }

    Ok(report)
}

// ============================================================================
// TESTS
// ============================================================================
