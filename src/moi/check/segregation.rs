//! Familial segregation checking.

use std::collections::HashSet;

use indexmap::IndexSet;

use super::pedigree::PedigreeByName;

/// Determine whether the carrier pattern in `called_variants` is consistent
/// with disease inheritance from `sample_id`'s point of view.
///
/// The proband must itself be a carrier. Starting there, the check walks up
/// through parents and grandparents: a carrier that is not affected fails the
/// check unless `partial_penetrance` relaxes it; affected carriers and
/// non-carriers are always consistent. The pedigree is a forest, so the walk
/// is bounded by its depth; a visited set guards against malformed loops.
pub fn check_familial_inheritance(
    pedigree: &PedigreeByName,
    sample_id: &str,
    called_variants: &IndexSet<String>,
    partial_penetrance: bool,
) -> bool {
    if !called_variants.contains(sample_id) {
        tracing::trace!("sample {} is not a carrier, cannot confirm", sample_id);
        return false;
    }

    let mut queue = vec![sample_id];
    let mut seen = HashSet::new();
    while let Some(current) = queue.pop() {
        if !seen.insert(current) {
            continue;
        }
        if pedigree.individual_by_name(current).is_none() {
            tracing::warn!("sample {} is not in the pedigree", current);
            return false;
        }
        if called_variants.contains(current) && !pedigree.is_affected(current) {
            if !partial_penetrance {
                tracing::trace!(
                    "unaffected carrier {} breaks segregation for {}",
                    current,
                    sample_id
                );
                return false;
            }
            tracing::trace!(
                "tolerating unaffected carrier {} under partial penetrance",
                current
            );
        }
        queue.extend(pedigree.parents_of(current));
    }

    true
}
