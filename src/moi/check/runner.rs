//! Dispatch from per-gene MOI strings to the filters to apply.

use crate::moi::check::comp_het::CompHetMap;
use crate::moi::check::filter::{
    DominantAutosomal, MoiFilter, RecessiveAutosomal, XDominant, XRecessive, YHemi,
};
use crate::moi::check::pedigree::PedigreeByName;
use crate::moi::check::schema::{ModeOfInheritance, MoiResult, SequenceVariant, ThresholdConfig};

/// An MOI string outside the fixed vocabulary; upstream gene panel data must
/// be corrected, so this is fatal and never tolerated.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown mode of inheritance: {0}")]
pub struct UnknownMoiError(pub String);

/// Applies the ordered filter list for one MOI string and concatenates the
/// per-filter results.
///
/// Filters are independent; the order only determines result ordering.
/// Results are never deduplicated, a sample qualifying under two models
/// carries both reasons downstream.
pub struct MoiRunner<'a> {
    /// The resolved target MOI.
    target_moi: ModeOfInheritance,
    /// Filters to apply, in order.
    filters: Vec<Box<dyn MoiFilter + 'a>>,
}

impl<'a> MoiRunner<'a> {
    /// Resolve `target_moi` into the ordered filter list.
    pub fn new(
        pedigree: &'a PedigreeByName,
        target_moi: &str,
        config: &'a ThresholdConfig,
    ) -> Result<Self, UnknownMoiError> {
        let target_moi = target_moi
            .parse::<ModeOfInheritance>()
            .map_err(|_| UnknownMoiError(target_moi.to_string()))?;
        let filters: Vec<Box<dyn MoiFilter + 'a>> = match target_moi {
            ModeOfInheritance::Monoallelic => {
                vec![Box::new(DominantAutosomal::new(pedigree, config))]
            }
            ModeOfInheritance::Biallelic => {
                vec![Box::new(RecessiveAutosomal::new(pedigree, config))]
            }
            ModeOfInheritance::MonoAndBiallelic | ModeOfInheritance::Unknown => vec![
                Box::new(DominantAutosomal::new(pedigree, config)),
                Box::new(RecessiveAutosomal::new(pedigree, config)),
            ],
            ModeOfInheritance::HemiMonoInFemale => vec![
                Box::new(XRecessive::new(pedigree, config)),
                Box::new(XDominant::new(pedigree, config)),
            ],
            ModeOfInheritance::HemiBiInFemale => {
                vec![Box::new(XRecessive::new(pedigree, config))]
            }
            ModeOfInheritance::YChromVariant => vec![Box::new(YHemi::new(pedigree, config))],
        };
        Ok(Self {
            target_moi,
            filters,
        })
    }

    /// The MOI this runner was resolved for.
    pub fn target_moi(&self) -> ModeOfInheritance {
        self.target_moi
    }

    /// The names of the filters applied, in order.
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    /// Run all filters on `principal` and concatenate their results.
    pub fn run(
        &self,
        principal: &SequenceVariant,
        comp_het: &CompHetMap,
    ) -> Result<Vec<MoiResult>, anyhow::Error> {
        let mut results = Vec::new();
        for filter in &self.filters {
            let mut filter_results = filter.run(principal, comp_het)?;
            tracing::trace!(
                "filter {} produced {} result(s) for {}",
                filter.name(),
                filter_results.len(),
                principal.coords
            );
            results.append(&mut filter_results);
        }
        Ok(results)
    }
}
