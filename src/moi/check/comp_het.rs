//! Compound-heterozygous second-hit lookup.
//!
//! The map is keyed `sample -> coordinate key -> partner variants` and only
//! ever holds variants of a single gene; it is built once, before any
//! parallel evaluation, and read-only afterwards.

use indexmap::IndexMap;
use itertools::Itertools;

use super::schema::SequenceVariant;

/// Per-gene comp-het index: sample name to canonical coordinate key to the
/// other het variants of that sample in the same gene.
pub type CompHetMap = IndexMap<String, IndexMap<String, Vec<SequenceVariant>>>;

/// Return the potential second hits for `sample` given the coordinate key of
/// the first variant.
///
/// A missing sample or key is not an error and yields an empty slice; whether
/// a partner actually qualifies (de novo or category evidence) is decided by
/// the calling filter.
pub fn check_for_second_hit<'a>(
    first_variant: &str,
    comp_hets: &'a CompHetMap,
    sample: &str,
) -> &'a [SequenceVariant] {
    comp_hets
        .get(sample)
        .and_then(|by_key| by_key.get(first_variant))
        .map(|partners| partners.as_slice())
        .unwrap_or(&[])
}

/// Index the heterozygous calls of one gene's variants for second-hit lookup.
///
/// Every het variant of a sample is paired with every *other* het variant of
/// the same sample; a sample with a single het call in the gene produces no
/// entry.
pub fn build_comp_het_map<'a>(
    variants: impl IntoIterator<Item = &'a SequenceVariant>,
) -> CompHetMap {
    let variants = variants.into_iter().collect::<Vec<_>>();
    let samples = variants
        .iter()
        .flat_map(|variant| variant.het_samples.iter().cloned())
        .unique()
        .collect::<Vec<_>>();

    let mut result = CompHetMap::new();
    for sample in samples {
        let het_calls = variants
            .iter()
            .filter(|variant| variant.het_samples.contains(&sample))
            .copied()
            .collect::<Vec<_>>();
        if het_calls.len() < 2 {
            continue;
        }
        let by_key: &mut IndexMap<_, _> = result.entry(sample).or_default();
        for (first, partner) in het_calls.iter().tuple_combinations() {
            by_key
                .entry(first.coords.to_string())
                .or_insert_with(Vec::new)
                .push((**partner).clone());
            by_key
                .entry(partner.coords.to_string())
                .or_insert_with(Vec::new)
                .push((**first).clone());
        }
    }
    result
}

#[cfg(test)]
mod test {
    use indexmap::{IndexMap, IndexSet};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{build_comp_het_map, check_for_second_hit, CompHetMap};
    use crate::moi::check::schema::{Coordinates, SequenceVariant};

    fn het_variant(chrom: &str, pos: i32, samples: &[&str]) -> SequenceVariant {
        SequenceVariant {
            coords: Coordinates {
                chrom: chrom.to_string(),
                pos,
                reference: String::from("A"),
                alternative: String::from("C"),
            },
            gene: String::from("ENSG0001"),
            het_samples: samples.iter().map(|s| s.to_string()).collect(),
            category_1: true,
            ..Default::default()
        }
    }

    #[rstest]
    // empty map
    #[case("", "", 0)]
    // sample not present
    #[case("", "a", 0)]
    // variant key not present
    #[case("1-2-A-C", "a", 0)]
    // sample and key present
    #[case("1-1-A-C", "a", 1)]
    fn check_for_second_hit_lookup(
        #[case] first: &str,
        #[case] sample: &str,
        #[case] expected_len: usize,
    ) {
        let mut comp_hets = CompHetMap::new();
        if !sample.is_empty() {
            comp_hets.insert(
                String::from("a"),
                IndexMap::from_iter([(
                    String::from("1-1-A-C"),
                    vec![het_variant("1", 2, &["a"])],
                )]),
            );
        }

        assert_eq!(
            check_for_second_hit(first, &comp_hets, sample).len(),
            expected_len
        );
    }

    #[test]
    fn check_for_second_hit_round_trip() {
        // exact round-trip: what was inserted comes back, in order
        let partners = vec![het_variant("1", 2, &["a"]), het_variant("1", 3, &["a"])];
        let comp_hets = CompHetMap::from_iter([(
            String::from("a"),
            IndexMap::from_iter([(String::from("1-1-A-C"), partners.clone())]),
        )]);

        assert_eq!(
            check_for_second_hit("1-1-A-C", &comp_hets, "a"),
            partners.as_slice()
        );
    }

    #[test]
    fn build_comp_het_map_pairs_other_hets() {
        let first = het_variant("1", 1, &["male", "only_one_call"]);
        let second = het_variant("1", 2, &["male"]);
        let comp_hets = build_comp_het_map([&first, &second]);

        // both directions are indexed for the shared sample
        assert_eq!(
            check_for_second_hit("1-1-A-C", &comp_hets, "male"),
            [second.clone()].as_slice()
        );
        assert_eq!(
            check_for_second_hit("1-2-A-C", &comp_hets, "male"),
            [first.clone()].as_slice()
        );
        // a single het call yields no pairing
        assert!(!comp_hets.contains_key("only_one_call"));
        // a variant is never its own partner
        assert!(check_for_second_hit("1-1-A-C", &comp_hets, "male")
            .iter()
            .all(|partner| partner.coords != first.coords));
    }

    #[test]
    fn build_comp_het_map_ignores_hom_calls() {
        let first = het_variant("1", 1, &["male"]);
        let second = SequenceVariant {
            hom_samples: IndexSet::from_iter([String::from("male")]),
            het_samples: IndexSet::new(),
            ..het_variant("1", 2, &[])
        };
        let comp_hets = build_comp_het_map([&first, &second]);

        // hom calls are not second hits; they pass the recessive model alone
        assert!(comp_hets.is_empty());
    }
}
