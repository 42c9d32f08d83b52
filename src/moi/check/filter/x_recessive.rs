//! X-linked recessive MOI filter.

use derive_new::new;

use indexmap::IndexSet;

use crate::common::canonical_chrom;
use crate::moi::check::comp_het::{check_for_second_hit, CompHetMap};
use crate::moi::check::pedigree::{PedigreeByName, Sex};
use crate::moi::check::schema::{MoiReason, MoiResult, SequenceVariant, ThresholdConfig};
use crate::moi::check::segregation::check_familial_inheritance;

use super::{biallelic_carriers, qualifying_second_hit, MoiFilter};

/// X-linked recessive: males are affected by a single (hemizygous) hit,
/// females need two hits, either a homozygous call or a compound-het pair.
/// Unaffected het females are expected carriers and never break segregation.
#[derive(Debug, new)]
pub struct XRecessive<'a> {
    /// The cohort pedigree.
    pedigree: &'a PedigreeByName,
    /// Population gates.
    config: &'a ThresholdConfig,
}

impl<'a> XRecessive<'a> {
    fn sex_of(&self, sample: &str) -> Sex {
        self.pedigree
            .individual_by_name(sample)
            .map(|individual| individual.sex)
            .unwrap_or(Sex::Unknown)
    }
}

impl MoiFilter for XRecessive<'_> {
    fn name(&self) -> &'static str {
        "XRecessive"
    }

    fn run(
        &self,
        principal: &SequenceVariant,
        comp_het: &CompHetMap,
    ) -> Result<Vec<MoiResult>, anyhow::Error> {
        let mut results = Vec::new();

        if canonical_chrom(&principal.coords.chrom) != "X" {
            tracing::warn!(
                "X-chromosome MOI applied to variant on {}",
                principal.coords.chrom
            );
        }

        if principal.gnomad_hom > self.config.gnomad_recessive_homozygous
            || principal.gnomad_hemi > self.config.gnomad_hemizygous
        {
            tracing::trace!(
                "variant {} fails X recessive population gate",
                principal.coords
            );
            return Ok(results);
        }

        // Any male call on X is hemizygous, whatever the recorded zygosity.
        let males = principal
            .carriers()
            .into_iter()
            .filter(|sample| self.sex_of(sample) == Sex::Male)
            .collect::<IndexSet<_>>();
        let hom_females = principal
            .hom_samples
            .iter()
            .filter(|sample| self.sex_of(sample) == Sex::Female)
            .cloned()
            .collect::<IndexSet<_>>();

        // The call set holds exactly the samples expected affected under the
        // model: hemizygous males and homozygous females.
        let expected_affected = males
            .union(&hom_females)
            .cloned()
            .collect::<IndexSet<String>>();

        for (samples, reason) in [
            (&males, MoiReason::XRecessiveMale),
            (&hom_females, MoiReason::XRecessiveFemale),
        ] {
            for sample in samples {
                if !principal.sample_specific_category_check(sample) {
                    tracing::trace!("no qualifying evidence for sample {} (skip)", sample);
                    continue;
                }
                if !check_familial_inheritance(self.pedigree, sample, &expected_affected, false) {
                    continue;
                }
                results.push(MoiResult::new(sample, reason));
            }
        }

        // Het females follow the compound-het path.
        let principal_key = principal.coords.to_string();
        for sample in &principal.het_samples {
            if self.sex_of(sample) != Sex::Female {
                continue;
            }
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
                    MoiReason::XRecessiveCompoundHetFemale,
                    &partner.coords,
                ));
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod test {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::moi::check::comp_het::CompHetMap;
    use crate::moi::check::filter::test::{sorted_reasons, variant};
    use crate::moi::check::filter::MoiFilter;
    use crate::moi::check::pedigree::test::two_trio_pedigree;
    use crate::moi::check::schema::{MoiReason, SequenceVariant, ThresholdConfig};

    use super::XRecessive;

    fn comp_het_map(sample: &str, key: &str, partner: &SequenceVariant) -> CompHetMap {
        CompHetMap::from_iter([(
            sample.to_string(),
            IndexMap::from_iter([(key.to_string(), vec![partner.clone()])]),
        )])
    }

    #[test]
    fn run_male_and_female_hom_pass() -> Result<(), anyhow::Error> {
        let pedigree = two_trio_pedigree();
        let config = ThresholdConfig::default();
        let principal = variant("x", 1, &[], &["female", "male"]);

        let results = XRecessive::new(&pedigree, &config).run(&principal, &CompHetMap::new())?;

        assert_eq!(results.len(), 2);
        assert_eq!(
            sorted_reasons(&results),
            vec!["X_Recessive Female", "X_Recessive Male"]
        );
        Ok(())
    }

    #[test]
    fn run_male_het_passes_as_hemizygous() -> Result<(), anyhow::Error> {
        let pedigree = two_trio_pedigree();
        let config = ThresholdConfig::default();
        let principal = variant("x", 1, &["male"], &[]);

        let results = XRecessive::new(&pedigree, &config).run(&principal, &CompHetMap::new())?;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].sample, "male");
        assert!(results[0].reasons.contains(&MoiReason::XRecessiveMale));
        Ok(())
    }

    #[test]
    fn run_female_het_with_second_hit_passes() -> Result<(), anyhow::Error> {
        let pedigree = two_trio_pedigree();
        let config = ThresholdConfig::default();
        let principal = variant("x", 1, &["female"], &[]);
        let partner = variant("x", 2, &["female"], &[]);
        let comp_hets = comp_het_map("female", "x-1-A-C", &partner);

        let results = XRecessive::new(&pedigree, &config).run(&principal, &comp_hets)?;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].sample, "female");
        assert!(results[0]
            .reasons
            .contains(&MoiReason::XRecessiveCompoundHetFemale));
        assert_eq!(results[0].support_vars, vec![String::from("x-2-A-C")]);
        Ok(())
    }

    #[test]
    fn run_female_het_with_mismatched_key_fails() -> Result<(), anyhow::Error> {
        let pedigree = two_trio_pedigree();
        let config = ThresholdConfig::default();
        let principal = variant("x", 1, &["female"], &[]);
        let partner = variant("x", 2, &["male"], &[]);
        // lookup is keyed by the principal's coordinates; this map is not
        let comp_hets = comp_het_map("female", "x-2-A-C", &partner);

        let results = XRecessive::new(&pedigree, &config).run(&principal, &comp_hets)?;

        assert_eq!(results, vec![]);
        Ok(())
    }

    #[test]
    fn run_female_het_without_pair_fails() -> Result<(), anyhow::Error> {
        let pedigree = two_trio_pedigree();
        let config = ThresholdConfig::default();
        let principal = variant("x", 1, &["female"], &[]);

        let results = XRecessive::new(&pedigree, &config).run(&principal, &CompHetMap::new())?;

        assert_eq!(results, vec![]);
        Ok(())
    }

    #[test]
    fn run_unaffected_het_mother_is_expected_carrier() -> Result<(), anyhow::Error> {
        let pedigree = two_trio_pedigree();
        let config = ThresholdConfig::default();
        // classic X-recessive trio: unaffected carrier mother, affected son
        let principal = variant("x", 1, &["mother_1"], &["male"]);

        let results = XRecessive::new(&pedigree, &config).run(&principal, &CompHetMap::new())?;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].sample, "male");
        assert!(results[0].reasons.contains(&MoiReason::XRecessiveMale));
        Ok(())
    }

    #[rstest]
    // too many homozygotes in the population
    #[case(3, 0)]
    // too many hemizygotes in the population
    #[case(0, 3)]
    fn run_population_gate_fails(
        #[case] gnomad_hom: i32,
        #[case] gnomad_hemi: i32,
    ) -> Result<(), anyhow::Error> {
        let pedigree = two_trio_pedigree();
        let config = ThresholdConfig::default();
        let mut principal = variant("x", 1, &[], &["male"]);
        principal.gnomad_hom = gnomad_hom;
        principal.gnomad_hemi = gnomad_hemi;

        let results = XRecessive::new(&pedigree, &config).run(&principal, &CompHetMap::new())?;

        assert_eq!(results, vec![]);
        Ok(())
    }

    #[test]
    fn run_unknown_sex_carrier_is_skipped() -> Result<(), anyhow::Error> {
        let pedigree = two_trio_pedigree();
        let config = ThresholdConfig::default();
        let principal = variant("x", 1, &[], &["stranger"]);

        let results = XRecessive::new(&pedigree, &config).run(&principal, &CompHetMap::new())?;

        assert_eq!(results, vec![]);
        Ok(())
    }
}
