//! Recessive autosomal MOI filter.

use derive_new::new;

use crate::moi::check::comp_het::{check_for_second_hit, CompHetMap};
use crate::moi::check::pedigree::PedigreeByName;
use crate::moi::check::schema::{MoiReason, MoiResult, SequenceVariant, ThresholdConfig};
use crate::moi::check::segregation::check_familial_inheritance;

use super::{biallelic_carriers, qualifying_second_hit, MoiFilter};

/// Two hits are required: a homozygous call, or a het call paired with a
/// second hit in the same gene.
#[derive(Debug, new)]
pub struct RecessiveAutosomal<'a> {
    /// The cohort pedigree.
    pedigree: &'a PedigreeByName,
    /// Population gates.
    config: &'a ThresholdConfig,
}

impl MoiFilter for RecessiveAutosomal<'_> {
    fn name(&self) -> &'static str {
        "RecessiveAutosomal"
    }

    fn run(
        &self,
        principal: &SequenceVariant,
        comp_het: &CompHetMap,
    ) -> Result<Vec<MoiResult>, anyhow::Error> {
        let mut results = Vec::new();

        if principal.gnomad_hom > self.config.gnomad_recessive_homozygous {
            tracing::trace!(
                "variant {} fails recessive homozygote gate",
                principal.coords
            );
            return Ok(results);
        }

        // Homozygous carriers qualify directly; unaffected het carriers
        // (typically the parents) are expected and stay out of the call set.
        for sample in &principal.hom_samples {
            if !principal.sample_specific_category_check(sample) {
                tracing::trace!("no qualifying evidence for sample {} (skip)", sample);
                continue;
            }
            if !check_familial_inheritance(self.pedigree, sample, &principal.hom_samples, false) {
                continue;
            }
            results.push(MoiResult::new(
                sample,
                MoiReason::AutosomalRecessiveHomozygous,
            ));
        }

        // Het carriers need a validated second hit from the same gene.
        let principal_key = principal.coords.to_string();
        for sample in &principal.het_samples {
            if !principal.sample_specific_category_check(sample) {
                tracing::trace!("no qualifying evidence for sample {} (skip)", sample);
                continue;
            }
            for partner in check_for_second_hit(&principal_key, comp_het, sample) {
                if partner.coords == principal.coords {
                    continue;
                }
                if !qualifying_second_hit(partner, sample) {
                    tracing::trace!(
                        "partner {} has no qualifying evidence for sample {}",
                        partner.coords,
                        sample
                    );
                    continue;
                }
                let called = biallelic_carriers(principal, partner);
                if !check_familial_inheritance(self.pedigree, sample, &called, false) {
                    continue;
                }
                results.push(MoiResult::new_supported(
                    sample,
                    MoiReason::AutosomalRecessiveCompoundHet,
                    &partner.coords,
                ));
            }
        }

        Ok(results)
    }
}
