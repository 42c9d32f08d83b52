//! The per-model MOI filter algorithms.
//!
//! Each filter is a pure function of (variant, pedigree, config, comp-het
//! map) to a list of results; producing zero results is success, not an
//! error.

use indexmap::IndexSet;

pub mod dominant_autosomal;
pub mod recessive_autosomal;
pub mod x_dominant;
pub mod x_recessive;
pub mod y_hemi;

pub use self::dominant_autosomal::DominantAutosomal;
pub use self::recessive_autosomal::RecessiveAutosomal;
pub use self::x_dominant::XDominant;
pub use self::x_recessive::XRecessive;
pub use self::y_hemi::YHemi;

use super::comp_het::CompHetMap;
use super::schema::{MoiResult, SequenceVariant};

/// Capability contract shared by all MOI filters.
pub trait MoiFilter: Send + Sync {
    /// Short filter name, for tracing and dispatch tests.
    fn name(&self) -> &'static str;

    /// Evaluate `principal` and return one result per passing sample.
    fn run(
        &self,
        principal: &SequenceVariant,
        comp_het: &CompHetMap,
    ) -> Result<Vec<MoiResult>, anyhow::Error>;
}

/// Samples het for both the principal and the partner variant: the call set
/// for segregation under a compound-het model, where a parent carrying only
/// one of the pair is an expected unaffected carrier.
pub(crate) fn biallelic_carriers(
    principal: &SequenceVariant,
    partner: &SequenceVariant,
) -> IndexSet<String> {
    principal
        .het_samples
        .intersection(&partner.het_samples)
        .cloned()
        .collect()
}

/// Whether `partner` can serve as a second hit for `sample`: it must look
/// de novo in that sample or carry cohort-wide category evidence.
pub(crate) fn qualifying_second_hit(partner: &SequenceVariant, sample: &str) -> bool {
    partner.sample_de_novo(sample) || partner.category_1_2_3()
}
