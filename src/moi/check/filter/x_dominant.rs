//! X-linked dominant MOI filter.

use derive_new::new;

use crate::common::canonical_chrom;
use crate::moi::check::comp_het::CompHetMap;
use crate::moi::check::pedigree::{PedigreeByName, Sex};
use crate::moi::check::schema::{MoiReason, MoiResult, SequenceVariant, ThresholdConfig};
use crate::moi::check::segregation::check_familial_inheritance;

use super::MoiFilter;

/// A single hit on the X chromosome is disease-causing in both sexes; males
/// are hemizygous, so the population gate also bounds hemizygote carriers.
#[derive(Debug, new)]
pub struct XDominant<'a> {
    /// The cohort pedigree.
    pedigree: &'a PedigreeByName,
    /// Population gates.
    config: &'a ThresholdConfig,
}

impl MoiFilter for XDominant<'_> {
    fn name(&self) -> &'static str {
        "XDominant"
    }

    fn run(
        &self,
        principal: &SequenceVariant,
        _comp_het: &CompHetMap,
    ) -> Result<Vec<MoiResult>, anyhow::Error> {
        let mut results = Vec::new();

        if canonical_chrom(&principal.coords.chrom) != "X" {
            tracing::warn!(
                "X-chromosome MOI applied to variant on {}",
                principal.coords.chrom
            );
        }

        if principal.gnomad_af > self.config.gnomad_rare_frequency
            || principal.gnomad_ac > self.config.gnomad_dominant_allele_count
            || principal.gnomad_hom > self.config.gnomad_dominant_homozygous
            || principal.gnomad_hemi > self.config.gnomad_hemizygous
        {
            tracing::trace!(
                "variant {} fails X dominant population gate",
                principal.coords
            );
            return Ok(results);
        }

        let carriers = principal.carriers();
        for sample in &carriers {
            if !principal.sample_specific_category_check(sample) {
                tracing::trace!("no qualifying evidence for sample {} (skip)", sample);
                continue;
            }
            if !check_familial_inheritance(self.pedigree, sample, &carriers, false) {
                continue;
            }
            let reason = match self
                .pedigree
                .individual_by_name(sample)
                .map(|individual| individual.sex)
            {
                Some(Sex::Female) => MoiReason::XDominantFemale,
                Some(Sex::Male) => MoiReason::XDominantMale,
                _ => {
                    tracing::warn!("carrier {} has unknown sex, no X zygosity rule", sample);
                    continue;
                }
            };
            results.push(MoiResult::new(sample, reason));
        }

        Ok(results)
    }
}
