//! Pedigree representation and PED file loading.
//!
//! The pedigree is consumed read-only by the segregation checker; parent
//! links must resolve within the pedigree, but parents need not appear in
//! any variant's carrier sets (unsequenced ancestors are common).

use std::path::Path;

use indexmap::IndexMap;

use crate::common::io::open_read_maybe_gz;

/// Sex from the PED file.
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
    Default,
    strum::Display,
)]
pub enum Sex {
    /// Unknown (PED code 0).
    #[default]
    #[serde(rename = "unknown")]
    #[strum(serialize = "unknown")]
    Unknown,
    /// Male (PED code 1).
    #[serde(rename = "male")]
    #[strum(serialize = "male")]
    Male,
    /// Female (PED code 2).
    #[serde(rename = "female")]
    #[strum(serialize = "female")]
    Female,
}

/// Disease status from the PED file.
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
    Default,
    strum::Display,
)]
pub enum Disease {
    /// Unknown (PED code 0 or -9).
    #[default]
    #[serde(rename = "unknown")]
    #[strum(serialize = "unknown")]
    Unknown,
    /// Unaffected (PED code 1).
    #[serde(rename = "unaffected")]
    #[strum(serialize = "unaffected")]
    Unaffected,
    /// Affected (PED code 2).
    #[serde(rename = "affected")]
    #[strum(serialize = "affected")]
    Affected,
}

/// One individual of the pedigree.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct Individual {
    /// Family identifier.
    pub family: String,
    /// Sample identifier, unique within the pedigree.
    pub name: String,
    /// Name of the father, if in the pedigree.
    pub father: Option<String>,
    /// Name of the mother, if in the pedigree.
    pub mother: Option<String>,
    /// Sex of the individual.
    pub sex: Sex,
    /// Disease status of the individual.
    pub disease: Disease,
}

/// Pedigree with individuals indexed by sample name.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct PedigreeByName {
    /// The individuals, by name, in input order.
    pub individuals: IndexMap<String, Individual>,
}

/// Raw PED file row; columns are family, name, father, mother, sex, disease.
#[derive(serde::Deserialize, Debug, Clone)]
struct PedFileRecord {
    family: String,
    name: String,
    father: String,
    mother: String,
    sex: i32,
    disease: i32,
}

impl From<PedFileRecord> for Individual {
    fn from(record: PedFileRecord) -> Self {
        let parent = |id: String| if id == "0" { None } else { Some(id) };
        Individual {
            family: record.family,
            name: record.name,
            father: parent(record.father),
            mother: parent(record.mother),
            sex: match record.sex {
                1 => Sex::Male,
                2 => Sex::Female,
                _ => Sex::Unknown,
            },
            disease: match record.disease {
                1 => Disease::Unaffected,
                2 => Disease::Affected,
                _ => Disease::Unknown,
            },
        }
    }
}

impl PedigreeByName {
    /// Construct from the given individuals; names must be unique.
    pub fn from_individuals(
        individuals: impl IntoIterator<Item = Individual>,
    ) -> Result<Self, anyhow::Error> {
        let mut result = PedigreeByName::default();
        for individual in individuals {
            let name = individual.name.clone();
            if result.individuals.insert(name.clone(), individual).is_some() {
                anyhow::bail!("duplicate individual {} in pedigree", name);
            }
        }
        Ok(result)
    }

    /// Load a pedigree from a (possibly gzip-ed) 6-column PED file.
    ///
    /// Lines starting with `#` are skipped.
    pub fn from_path<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .comment(Some(b'#'))
            .from_reader(open_read_maybe_gz(path.as_ref())?);
        let mut individuals = Vec::new();
        for record in reader.deserialize() {
            let record: PedFileRecord = record.map_err(|e| {
                anyhow::anyhow!("problem reading PED file {:?}: {}", path.as_ref(), e)
            })?;
            individuals.push(Individual::from(record));
        }
        Self::from_individuals(individuals)
    }

    /// Look up an individual by sample name.
    pub fn individual_by_name(&self, name: &str) -> Option<&Individual> {
        self.individuals.get(name)
    }

    /// Whether `name` is in the pedigree and affected.
    pub fn is_affected(&self, name: &str) -> bool {
        self.individual_by_name(name)
            .map(|individual| individual.disease == Disease::Affected)
            .unwrap_or(false)
    }

    /// The parent names of `name` that are present in the pedigree record.
    pub fn parents_of(&self, name: &str) -> Vec<&str> {
        self.individual_by_name(name)
            .map(|individual| {
                individual
                    .father
                    .iter()
                    .chain(individual.mother.iter())
                    .map(|parent| parent.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check that all parent links reference individuals of this pedigree.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        for individual in self.individuals.values() {
            for parent in individual.father.iter().chain(individual.mother.iter()) {
                if !self.individuals.contains_key(parent) {
                    anyhow::bail!(
                        "individual {} references parent {} not in pedigree",
                        individual.name,
                        parent
                    );
                }
            }
        }
        Ok(())
    }
}
