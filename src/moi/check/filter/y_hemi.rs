//! Y-linked hemizygous MOI filter.

use derive_new::new;

use crate::common::canonical_chrom;
use crate::moi::check::comp_het::CompHetMap;
use crate::moi::check::pedigree::{PedigreeByName, Sex};
use crate::moi::check::schema::{MoiReason, MoiResult, SequenceVariant, ThresholdConfig};
use crate::moi::check::segregation::check_familial_inheritance;

use super::MoiFilter;

/// Y chromosome variants are carried by males only; a female carrier is
/// corrupted input, not a skippable sample.
#[derive(Debug, new)]
pub struct YHemi<'a> {
    /// The cohort pedigree.
    pedigree: &'a PedigreeByName,
    /// Population gates.
    config: &'a ThresholdConfig,
}

impl MoiFilter for YHemi<'_> {
    fn name(&self) -> &'static str {
        "YHemi"
    }

    fn run(
        &self,
        principal: &SequenceVariant,
        _comp_het: &CompHetMap,
    ) -> Result<Vec<MoiResult>, anyhow::Error> {
        let mut results = Vec::new();

        if canonical_chrom(&principal.coords.chrom) != "Y" {
            tracing::warn!(
                "Y-chromosome MOI applied to variant on {}",
                principal.coords.chrom
            );
        }

        if principal.gnomad_af > self.config.gnomad_rare_frequency
            || principal.gnomad_ac > self.config.gnomad_dominant_allele_count
            || principal.gnomad_hemi > self.config.gnomad_hemizygous
        {
            tracing::trace!(
                "variant {} fails Y hemizygous population gate",
                principal.coords
            );
            return Ok(results);
        }

        // Upstream callers record Y calls as het or hom; both count.
        let carriers = principal.carriers();
        for sample in &carriers {
            if self
                .pedigree
                .individual_by_name(sample)
                .map(|individual| individual.sex)
                == Some(Sex::Female)
            {
                anyhow::bail!(
                    "sample {} is female but carries Y-chromosome variant {}",
                    sample,
                    principal.coords
                );
            }
            if !principal.sample_specific_category_check(sample) {
                tracing::trace!("no qualifying evidence for sample {} (skip)", sample);
                continue;
            }
            if !check_familial_inheritance(self.pedigree, sample, &carriers, false) {
                continue;
            }
            results.push(MoiResult::new(sample, MoiReason::YHemizygous));
        }

        Ok(results)
    }
}
