//! Dominant autosomal MOI filter.

use derive_new::new;

use crate::moi::check::comp_het::CompHetMap;
use crate::moi::check::pedigree::PedigreeByName;
use crate::moi::check::schema::{MoiReason, MoiResult, SequenceVariant, ThresholdConfig};
use crate::moi::check::segregation::check_familial_inheritance;

use super::MoiFilter;

/// A single hit is disease-causing; any carrier is expected to be affected.
#[derive(Debug, new)]
pub struct DominantAutosomal<'a> {
    /// The cohort pedigree.
    pedigree: &'a PedigreeByName,
    /// Population gates.
    config: &'a ThresholdConfig,
}

impl MoiFilter for DominantAutosomal<'_> {
    fn name(&self) -> &'static str {
        "DominantAutosomal"
    }

    fn run(
        &self,
        principal: &SequenceVariant,
        _comp_het: &CompHetMap,
    ) -> Result<Vec<MoiResult>, anyhow::Error> {
        let mut results = Vec::new();

        // Dominant models use the most stringent population gates.
        if principal.gnomad_af > self.config.gnomad_rare_frequency
            || principal.gnomad_ac > self.config.gnomad_dominant_allele_count
            || principal.gnomad_hom > self.config.gnomad_dominant_homozygous
        {
            tracing::trace!(
                "variant {} fails dominant population gate",
                principal.coords
            );
            return Ok(results);
        }

        // Both zygosities qualify; every carrier is expected affected.
        let carriers = principal.carriers();
        for sample in &carriers {
            if !principal.sample_specific_category_check(sample) {
                tracing::trace!("no qualifying evidence for sample {} (skip)", sample);
                continue;
            }
            if !check_familial_inheritance(self.pedigree, sample, &carriers, false) {
                continue;
            }
            results.push(MoiResult::new(sample, MoiReason::AutosomalDominant));
        }

        Ok(results)
    }
}
