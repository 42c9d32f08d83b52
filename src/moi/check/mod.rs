//! Code implementing the "moi check" sub command.
//!
//! Consumes pre-annotated variant records (JSONL), a PED pedigree, and a
//! per-gene MOI map; emits one JSONL record per variant-gene pair with at
//! least one passing MOI verdict.

pub mod comp_het;
pub mod filter;
pub mod pedigree;
pub mod runner;
pub mod schema;
pub mod segregation;

use std::io::BufRead;
use std::io::Write;
use std::time::Instant;

use clap::Parser;
use indexmap::IndexMap;
use rayon::prelude::*;

use crate::common::io::{open_read_maybe_gz, open_write_maybe_gz};
use crate::common::trace_rss_now;

use self::comp_het::{build_comp_het_map, CompHetMap};
use self::pedigree::PedigreeByName;
use self::runner::MoiRunner;
use self::schema::{ReportedVariant, SequenceVariant, ThresholdConfig};

/// Command line arguments for `moi check` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Run MOI consistency checks", long_about = None)]
pub struct Args {
    /// Path to the variants JSONL file.
    #[arg(long, required = true)]
    pub path_input: String,
    /// Path to the pedigree (PED) file.
    #[arg(long, required = true)]
    pub path_ped: String,
    /// Path to the gene-to-MOI JSON map.
    #[arg(long, required = true)]
    pub path_moi: String,
    /// Path to the threshold configuration JSON file; built-in defaults
    /// apply when absent.
    #[arg(long)]
    pub path_config: Option<String>,
    /// Path to the output JSONL file.
    #[arg(long, required = true)]
    pub path_output: String,
}

/// Load the threshold configuration, falling back to the defaults.
fn load_config(path_config: Option<&str>) -> Result<ThresholdConfig, anyhow::Error> {
    match path_config {
        Some(path) => {
            let config = serde_json::from_reader(open_read_maybe_gz(path)?)
                .map_err(|e| anyhow::anyhow!("problem loading config from {}: {}", path, e))?;
            Ok(config)
        }
        None => Ok(ThresholdConfig::default()),
    }
}

/// Load the `gene -> MOI string` map.
fn load_moi_map(path: &str) -> Result<IndexMap<String, String>, anyhow::Error> {
    serde_json::from_reader(open_read_maybe_gz(path)?)
        .map_err(|e| anyhow::anyhow!("problem loading MOI map from {}: {}", path, e))
}

/// Load and validate the variant records, one JSON object per line.
fn load_variants(path: &str) -> Result<Vec<SequenceVariant>, anyhow::Error> {
    let reader = open_read_maybe_gz(path)?;
    let mut variants = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let variant: SequenceVariant = serde_json::from_str(&line).map_err(|e| {
            anyhow::anyhow!("problem parsing variant on line {} of {}: {}", lineno + 1, path, e)
        })?;
        variant.validate()?;
        variants.push(variant);
    }
    Ok(variants)
}

/// The MOI string declared for `gene`, defaulting to `Unknown`.
fn moi_for_gene<'a>(moi_by_gene: &'a IndexMap<String, String>, gene: &str) -> &'a str {
    moi_by_gene.get(gene).map(String::as_str).unwrap_or("Unknown")
}

/// Evaluate all variant records and keep those with at least one verdict.
///
/// Runners and comp-het maps are prepared up front and shared read-only
/// across the rayon workers; each variant evaluation is independent.
pub fn annotate_variants(
    pedigree: &PedigreeByName,
    config: &ThresholdConfig,
    moi_by_gene: &IndexMap<String, String>,
    variants: &[SequenceVariant],
) -> Result<Vec<ReportedVariant>, anyhow::Error> {
    let mut by_gene: IndexMap<&str, Vec<&SequenceVariant>> = IndexMap::new();
    for variant in variants {
        by_gene.entry(variant.gene.as_str()).or_default().push(variant);
    }

    // One runner per distinct MOI string; an unknown string is fatal here.
    let mut runners: IndexMap<&str, MoiRunner> = IndexMap::new();
    for gene in by_gene.keys() {
        if !moi_by_gene.contains_key(*gene) {
            tracing::debug!("gene {} has no declared MOI, assuming Unknown", gene);
        }
        let moi = moi_for_gene(moi_by_gene, gene);
        if !runners.contains_key(moi) {
            let runner = MoiRunner::new(pedigree, moi, config)?;
            tracing::debug!(
                "MOI {} resolves to filters {:?}",
                runner.target_moi(),
                runner.filter_names()
            );
            runners.insert(moi, runner);
        }
    }

    // Comp-het maps are per gene and complete before the parallel section.
    let comp_hets: IndexMap<&str, CompHetMap> = by_gene
        .iter()
        .map(|(gene, gene_variants)| (*gene, build_comp_het_map(gene_variants.iter().copied())))
        .collect();

    let reported = variants
        .par_iter()
        .map(|variant| {
            let gene = variant.gene.as_str();
            let runner = runners
                .get(moi_for_gene(moi_by_gene, gene))
                .expect("runner was prepared above");
            let comp_het = comp_hets.get(gene).expect("comp-het map was prepared above");
            runner
                .run(variant, comp_het)
                .map(|results| ReportedVariant {
                    coords: variant.coords.clone(),
                    gene: gene.to_string(),
                    results,
                })
        })
        .collect::<Result<Vec<_>, anyhow::Error>>()?;

    Ok(reported
        .into_iter()
        .filter(|record| !record.results.is_empty())
        .collect())
}

/// Main entry point for `moi check` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let before_anything = Instant::now();
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    tracing::info!("loading thresholds...");
    let config = load_config(args.path_config.as_deref())?;
    tracing::info!("thresholds = {}", serde_json::to_string(&config)?);

    tracing::info!("loading pedigree...");
    let pedigree = PedigreeByName::from_path(&args.path_ped)?;
    pedigree.validate()?;
    tracing::info!("... loaded {} individuals", pedigree.individuals.len());

    tracing::info!("loading gene MOI map...");
    let moi_by_gene = load_moi_map(&args.path_moi)?;
    tracing::info!("... loaded MOI strings for {} genes", moi_by_gene.len());

    tracing::info!("loading variants...");
    let variants = load_variants(&args.path_input)?;
    tracing::info!("... loaded {} variant records", variants.len());

    trace_rss_now();

    tracing::info!("running MOI filters...");
    let before_filtering = Instant::now();
    let reported = annotate_variants(&pedigree, &config, &moi_by_gene, &variants)?;
    tracing::info!(
        "... done running MOI filters in {:?}",
        before_filtering.elapsed()
    );

    tracing::info!("writing results to {}...", &args.path_output);
    let mut writer = open_write_maybe_gz(&args.path_output)?;
    for record in &reported {
        writeln!(writer, "{}", serde_json::to_string(record)?)?;
    }
    writer.flush()?;

    trace_rss_now();
    tracing::info!(
        "wrote {} record(s), all done in {:?}",
        reported.len(),
        before_anything.elapsed()
    );

    Ok(())
}
