//! Supporting code for MOI check definition.
//!
//! The records defined here correspond to what the upstream annotation stage
//! writes out: one record per variant-gene pair with population counts,
//! category flags, and per-sample zygosity sets.

use indexmap::IndexSet;

/// Immutable variant identity; `Display` renders the canonical
/// `"chrom-pos-ref-alt"` key used for comp-het lookup and dedup.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Default,
)]
pub struct Coordinates {
    /// Chromosome name.
    pub chrom: String,
    /// 1-based position of the variant.
    pub pos: i32,
    /// Reference allele.
    pub reference: String,
    /// Alternative allele.
    pub alternative: String,
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.chrom, self.pos, self.reference, self.alternative
        )
    }
}

/// Definition of a candidate variant with per-sample zygosity calls.
///
/// Population fields absent from the input deserialize to zero so that novel
/// variants without population observations pass the frequency gates.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug, Clone, Default)]
pub struct SequenceVariant {
    /// Variant coordinates.
    #[serde(flatten)]
    pub coords: Coordinates,
    /// Gene this record was annotated onto (one record per variant-gene pair).
    pub gene: String,

    /// gnomAD allele frequency.
    #[serde(default)]
    pub gnomad_af: f32,
    /// gnomAD allele count.
    #[serde(default)]
    pub gnomad_ac: i32,
    /// Number of homozygous carriers in gnomAD.
    #[serde(default)]
    pub gnomad_hom: i32,
    /// Number of hemizygous carriers in gnomAD.
    #[serde(default)]
    pub gnomad_hemi: i32,

    /// Samples carrying the variant heterozygously.
    #[serde(default)]
    pub het_samples: IndexSet<String>,
    /// Samples carrying the variant homozygously.
    #[serde(default)]
    pub hom_samples: IndexSet<String>,

    /// Category 1 evidence flag (cohort-wide).
    #[serde(default)]
    pub category_1: bool,
    /// Category 2 evidence flag (cohort-wide).
    #[serde(default)]
    pub category_2: bool,
    /// Category 3 evidence flag (cohort-wide).
    #[serde(default)]
    pub category_3: bool,
    /// Samples for which this variant is a plausible de novo event
    /// (category 4 is per-sample, not cohort-wide).
    #[serde(default)]
    pub category_4: IndexSet<String>,
}

impl SequenceVariant {
    /// Combined categories 1-3, the cohort-wide evidence gate.
    pub fn category_1_2_3(&self) -> bool {
        self.category_1 || self.category_2 || self.category_3
    }

    /// Whether this variant looks de novo in `sample`.
    pub fn sample_de_novo(&self, sample: &str) -> bool {
        self.category_4.contains(sample)
    }

    /// Whether any qualifying evidence applies to `sample`: combined
    /// categories 1-3, or a sample-specific category 4 hit.
    pub fn sample_specific_category_check(&self, sample: &str) -> bool {
        self.category_1_2_3() || self.sample_de_novo(sample)
    }

    /// All samples carrying the variant, regardless of zygosity.
    pub fn carriers(&self) -> IndexSet<String> {
        self.het_samples
            .union(&self.hom_samples)
            .cloned()
            .collect()
    }

    /// Check input invariants: population values must be non-negative and a
    /// sample must not be called both het and hom.
    ///
    /// Fields *missing* from the input are zero and valid; only explicitly
    /// negative or contradictory data is rejected.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.gnomad_af < 0.0 {
            anyhow::bail!(
                "negative gnomad_af {} for variant {}",
                self.gnomad_af,
                self.coords
            );
        }
        for (name, value) in [
            ("gnomad_ac", self.gnomad_ac),
            ("gnomad_hom", self.gnomad_hom),
            ("gnomad_hemi", self.gnomad_hemi),
        ] {
            if value < 0 {
                anyhow::bail!("negative {} {} for variant {}", name, value, self.coords);
            }
        }
        if let Some(sample) = self.het_samples.intersection(&self.hom_samples).next() {
            anyhow::bail!(
                "sample {} called both het and hom for variant {}",
                sample,
                self.coords
            );
        }
        Ok(())
    }
}

/// Named numeric population gates consumed by the MOI filters.
///
/// All boundaries are inclusive on the passing side: a variant passes a gate
/// iff the observed value is `<=` the threshold. Never mutated after
/// construction.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Maximal number of homozygous carriers in gnomAD for recessive models.
    pub gnomad_recessive_homozygous: i32,
    /// Maximal number of homozygous carriers in gnomAD for dominant models.
    pub gnomad_dominant_homozygous: i32,
    /// Maximal allele count in gnomAD for dominant models.
    pub gnomad_dominant_allele_count: i32,
    /// Maximal gnomAD allele frequency for a variant to count as rare.
    pub gnomad_rare_frequency: f32,
    /// Maximal number of hemizygous carriers in gnomAD for X/Y models.
    pub gnomad_hemizygous: i32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            gnomad_recessive_homozygous: 2,
            gnomad_dominant_homozygous: 1,
            gnomad_dominant_allele_count: 10,
            gnomad_rare_frequency: 0.01,
            gnomad_hemizygous: 2,
        }
    }
}

/// The fixed vocabulary of per-gene MOI strings supplied by gene panels.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
    strum::Display,
    strum::EnumString,
)]
pub enum ModeOfInheritance {
    /// One hit is sufficient (autosomal dominant).
    #[serde(rename = "Monoallelic")]
    #[strum(serialize = "Monoallelic")]
    Monoallelic,
    /// Two hits are required (autosomal recessive).
    #[serde(rename = "Biallelic")]
    #[strum(serialize = "Biallelic")]
    Biallelic,
    /// Both dominant and recessive models apply.
    #[serde(rename = "Mono_And_Biallelic")]
    #[strum(serialize = "Mono_And_Biallelic")]
    MonoAndBiallelic,
    /// No declared MOI; both autosomal models are tested.
    #[serde(rename = "Unknown")]
    #[strum(serialize = "Unknown")]
    Unknown,
    /// X-linked, one hit sufficient in females.
    #[serde(rename = "Hemi_Mono_In_Female")]
    #[strum(serialize = "Hemi_Mono_In_Female")]
    HemiMonoInFemale,
    /// X-linked, two hits required in females.
    #[serde(rename = "Hemi_Bi_In_Female")]
    #[strum(serialize = "Hemi_Bi_In_Female")]
    HemiBiInFemale,
    /// Y-linked, males only.
    #[serde(rename = "Y_Chrom_Variant")]
    #[strum(serialize = "Y_Chrom_Variant")]
    YChromVariant,
}

/// The inheritance reasons a filter can attach to a passing sample.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
    strum::Display,
)]
pub enum MoiReason {
    /// Het or hom carrier under the dominant autosomal model.
    #[serde(rename = "Autosomal Dominant")]
    #[strum(serialize = "Autosomal Dominant")]
    AutosomalDominant,
    /// Homozygous carrier under the recessive autosomal model.
    #[serde(rename = "Autosomal Recessive Homozygous")]
    #[strum(serialize = "Autosomal Recessive Homozygous")]
    AutosomalRecessiveHomozygous,
    /// Het carrier with a validated second hit in the same gene.
    #[serde(rename = "Autosomal Recessive Compound-Het")]
    #[strum(serialize = "Autosomal Recessive Compound-Het")]
    AutosomalRecessiveCompoundHet,
    /// Female carrier under the X dominant model.
    #[serde(rename = "X_Dominant Female")]
    #[strum(serialize = "X_Dominant Female")]
    XDominantFemale,
    /// Male (hemizygous) carrier under the X dominant model.
    #[serde(rename = "X_Dominant Male")]
    #[strum(serialize = "X_Dominant Male")]
    XDominantMale,
    /// Male (hemizygous) carrier under the X recessive model.
    #[serde(rename = "X_Recessive Male")]
    #[strum(serialize = "X_Recessive Male")]
    XRecessiveMale,
    /// Female homozygous carrier under the X recessive model.
    #[serde(rename = "X_Recessive Female")]
    #[strum(serialize = "X_Recessive Female")]
    XRecessiveFemale,
    /// Female het carrier with a validated second hit on the X chromosome.
    #[serde(rename = "X_Recessive Compound-Het Female")]
    #[strum(serialize = "X_Recessive Compound-Het Female")]
    XRecessiveCompoundHetFemale,
    /// Male carrier of a Y chromosome variant.
    #[serde(rename = "Y_Hemizygous")]
    #[strum(serialize = "Y_Hemizygous")]
    YHemizygous,
}

/// One MOI verdict: a sample that passed a filter, the inheritance reasons,
/// and the comp-het partner keys where applicable.
///
/// Results are created fresh per passing sample per filter and never merged
/// across filters.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct MoiResult {
    /// The passing sample.
    pub sample: String,
    /// Inheritance reasons for this sample.
    pub reasons: IndexSet<MoiReason>,
    /// Canonical coordinate keys of paired second-hit variants, for
    /// compound-het calls.
    #[serde(default)]
    pub support_vars: Vec<String>,
}

impl MoiResult {
    /// Construct a result for `sample` with a single `reason`.
    pub fn new(sample: &str, reason: MoiReason) -> Self {
        Self {
            sample: sample.to_string(),
            reasons: std::iter::once(reason).collect(),
            support_vars: Vec::new(),
        }
    }

    /// Construct a compound-het result for `sample` supported by `partner`.
    pub fn new_supported(sample: &str, reason: MoiReason, partner: &Coordinates) -> Self {
        Self {
            sample: sample.to_string(),
            reasons: std::iter::once(reason).collect(),
            support_vars: vec![partner.to_string()],
        }
    }
}

/// Output record for one variant-gene pair with at least one MOI verdict.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug, Clone)]
pub struct ReportedVariant {
    /// Variant coordinates.
    #[serde(flatten)]
    pub coords: Coordinates,
    /// Gene the verdicts apply to.
    pub gene: String,
    /// The concatenated verdicts of all applied filters.
    pub results: Vec<MoiResult>,
}

#[cfg(test)]
pub mod test {
    use indexmap::IndexSet;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Coordinates, ModeOfInheritance, MoiReason, MoiResult, SequenceVariant};

    pub fn coordinates(chrom: &str, pos: i32) -> Coordinates {
        Coordinates {
            chrom: chrom.to_string(),
            pos,
            reference: String::from("A"),
            alternative: String::from("C"),
        }
    }

    #[test]
    fn coordinates_display() {
        assert_eq!(coordinates("1", 1).to_string(), "1-1-A-C");
        assert_eq!(coordinates("x", 123).to_string(), "x-123-A-C");
    }

    #[test]
    fn sequence_variant_missing_population_fields_are_zero() -> Result<(), anyhow::Error> {
        // Novel variants come without population observations; the gates
        // must see zeroes, not an error.
        let variant: SequenceVariant = serde_json::from_str(
            r#"{
                "chrom": "1", "pos": 1, "reference": "A", "alternative": "C",
                "gene": "ENSG0001", "het_samples": ["male"], "category_1": true
            }"#,
        )?;
        assert_eq!(variant.gnomad_ac, 0);
        assert_eq!(variant.gnomad_hom, 0);
        assert_eq!(variant.gnomad_hemi, 0);
        assert!(float_cmp::approx_eq!(f32, variant.gnomad_af, 0.0));
        variant.validate()?;
        Ok(())
    }

    #[rstest]
    // negative frequency is corrupt input
    #[case(r#"{"chrom": "1", "pos": 1, "reference": "A", "alternative": "C", "gene": "G", "gnomad_af": -0.5}"#)]
    // negative count is corrupt input
    #[case(r#"{"chrom": "1", "pos": 1, "reference": "A", "alternative": "C", "gene": "G", "gnomad_hom": -1}"#)]
    // zygosity is exclusive per sample
    #[case(r#"{"chrom": "1", "pos": 1, "reference": "A", "alternative": "C", "gene": "G", "het_samples": ["s1"], "hom_samples": ["s1"]}"#)]
    fn sequence_variant_validate_rejects(#[case] json: &str) -> Result<(), anyhow::Error> {
        let variant: SequenceVariant = serde_json::from_str(json)?;
        assert!(variant.validate().is_err());
        Ok(())
    }

    #[test]
    fn sample_specific_category_check() {
        let variant = SequenceVariant {
            coords: coordinates("1", 1),
            gene: String::from("G"),
            category_3: true,
            category_4: IndexSet::from_iter([String::from("s2")]),
            ..Default::default()
        };
        // category 1-3 is cohort-wide evidence
        assert!(variant.sample_specific_category_check("s1"));
        // category 4 only counts for the named sample
        assert!(variant.sample_de_novo("s2"));
        assert!(!variant.sample_de_novo("s1"));
    }

    #[rstest]
    #[case("Monoallelic", ModeOfInheritance::Monoallelic)]
    #[case("Biallelic", ModeOfInheritance::Biallelic)]
    #[case("Mono_And_Biallelic", ModeOfInheritance::MonoAndBiallelic)]
    #[case("Unknown", ModeOfInheritance::Unknown)]
    #[case("Hemi_Mono_In_Female", ModeOfInheritance::HemiMonoInFemale)]
    #[case("Hemi_Bi_In_Female", ModeOfInheritance::HemiBiInFemale)]
    #[case("Y_Chrom_Variant", ModeOfInheritance::YChromVariant)]
    fn mode_of_inheritance_round_trip(
        #[case] moi_string: &str,
        #[case] expected: ModeOfInheritance,
    ) -> Result<(), anyhow::Error> {
        assert_eq!(moi_string.parse::<ModeOfInheritance>()?, expected);
        assert_eq!(expected.to_string(), moi_string);
        Ok(())
    }

    #[test]
    fn moi_reason_display() {
        assert_eq!(
            MoiReason::AutosomalDominant.to_string(),
            "Autosomal Dominant"
        );
        assert_eq!(
            MoiReason::XRecessiveCompoundHetFemale.to_string(),
            "X_Recessive Compound-Het Female"
        );
    }

    #[test]
    fn moi_result_serialization() -> Result<(), anyhow::Error> {
        let result = MoiResult::new_supported(
            "female",
            MoiReason::AutosomalRecessiveCompoundHet,
            &coordinates("2", 2),
        );
        assert_eq!(
            serde_json::to_string(&result)?,
            r#"{"sample":"female","reasons":["Autosomal Recessive Compound-Het"],"support_vars":["2-2-A-C"]}"#
        );
        Ok(())
    }

    #[test]
    fn threshold_config_default() {
        insta::assert_yaml_snapshot!(super::ThresholdConfig::default(), @r###"
        ---
        gnomad_recessive_homozygous: 2
        gnomad_dominant_homozygous: 1
        gnomad_dominant_allele_count: 10
        gnomad_rare_frequency: 0.01
        gnomad_hemizygous: 2
        "###);
    }
}
