use log::debug;
use std::collections::BTreeMap;

use crate::config::TallyErrors;

/// The curated synonyms seen in the survey answers so far.
///
/// Keys are written in folded form (see [fold]).
const DEFAULT_SYNONYMS: &[(&str, &str)] = &[
    ("ai/ml", "AI/ML"),
    ("cloud computing", "Cloud Computing"),
    ("cyber security", "Cyber Security"),
    ("web developer", "Web Development"),
    ("web development", "Web Development"),
    ("game developer", "Game Development"),
    ("game development", "Game Development"),
    ("data analyst", "Data Analytics"),
    ("data analytics", "Data Analytics"),
    ("big data", "Big Data"),
];

/// Folds a token into the form used for lookups: trimmed, runs of whitespace
/// replaced by a single space, and lower case.
pub fn fold(token: &str) -> String {
    collapse_whitespace(token).to_lowercase()
}

fn collapse_whitespace(token: &str) -> String {
    token.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// A mapping from synonyms to canonical interest labels.
///
/// ```
/// use interest_tally::Taxonomy;
///
/// let taxonomy = Taxonomy::new(&[("ML", "Machine Learning"), ("machine learning", "Machine Learning")])?;
/// assert_eq!(taxonomy.lookup("  Ml "), Some("Machine Learning"));
/// assert_eq!(taxonomy.lookup("Robotics"), None);
/// # Ok::<(), interest_tally::TallyErrors>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Hash, Default)]
pub struct Taxonomy {
    // folded synonym -> label
    synonyms: BTreeMap<String, String>,
}

impl Taxonomy {
    pub fn new<S: AsRef<str>, L: AsRef<str>>(pairs: &[(S, L)]) -> Result<Taxonomy, TallyErrors> {
        let mut synonyms: BTreeMap<String, String> = BTreeMap::new();
        for (synonym, label) in pairs.iter() {
            let key = fold(synonym.as_ref());
            if key.is_empty() {
                return Err(TallyErrors::EmptySynonym);
            }
            let label = label.as_ref().trim();
            if label.is_empty() {
                return Err(TallyErrors::EmptyLabel(synonym.as_ref().to_string()));
            }
            match synonyms.get(&key) {
                Some(prev) if prev != label => {
                    return Err(TallyErrors::ConflictingSynonym {
                        synonym: key,
                        first: prev.clone(),
                        second: label.to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    synonyms.insert(key, label.to_string());
                }
            }
        }
        debug!("Taxonomy::new: {} synonyms", synonyms.len());
        Ok(Taxonomy { synonyms })
    }

    pub fn default_taxonomy() -> Taxonomy {
        Taxonomy {
            synonyms: DEFAULT_SYNONYMS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// The canonical label for this token, if the token is a known synonym.
    /// The token does not need to be folded beforehand.
    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.synonyms.get(&fold(token)).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.synonyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }

    /// The (folded synonym, label) pairs, sorted by synonym.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.synonyms.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Maps raw interest tokens to canonical interests.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Normalizer {
    taxonomy: Taxonomy,
    uppercase_output: bool,
}

impl Normalizer {
    pub fn new(taxonomy: Taxonomy, uppercase_output: bool) -> Normalizer {
        Normalizer {
            taxonomy,
            uppercase_output,
        }
    }

    /// Returns the canonical interest for a token.
    ///
    /// Known synonyms are replaced by their label, whatever their casing.
    /// Unknown tokens are passed through (with whitespace collapsed).
    /// The token is expected to be non-empty.
    pub fn normalize(&self, raw_token: &str) -> String {
        let label = match self.taxonomy.lookup(raw_token) {
            Some(label) => label.to_string(),
            None => collapse_whitespace(raw_token),
        };
        if self.uppercase_output {
            label.to_uppercase()
        } else {
            label
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn uppercase_output(&self) -> bool {
        self.uppercase_output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_normalizer() -> Normalizer {
        Normalizer::new(Taxonomy::default_taxonomy(), true)
    }

    #[test]
    fn casing_variants_collapse() {
        let n = default_normalizer();
        assert_eq!(n.normalize("ai/ml"), "AI/ML");
        assert_eq!(n.normalize("AI/ML"), "AI/ML");
        assert_eq!(n.normalize("Ai/ML"), "AI/ML");
        assert_eq!(n.normalize("aI/mL"), "AI/ML");
    }

    #[test]
    fn synonyms_map_to_label() {
        let n = default_normalizer();
        assert_eq!(n.normalize("Web developer"), "WEB DEVELOPMENT");
        assert_eq!(n.normalize("web  Development"), "WEB DEVELOPMENT");
        assert_eq!(n.normalize("Data analyst"), "DATA ANALYTICS");
    }

    #[test]
    fn unknown_tokens_pass_through() {
        let n = default_normalizer();
        assert_eq!(n.normalize("Blockchain"), "BLOCKCHAIN");
        assert_eq!(n.normalize("BLOCKCHAIN"), "BLOCKCHAIN");
        assert_eq!(n.normalize("Quantum   computing"), "QUANTUM COMPUTING");
    }

    #[test]
    fn mixed_case_output() {
        let n = Normalizer::new(Taxonomy::default_taxonomy(), false);
        assert_eq!(n.normalize("cloud COMPUTING"), "Cloud Computing");
        assert_eq!(n.normalize("Blockchain"), "Blockchain");
        assert_eq!(n.normalize("BLOCKCHAIN"), "BLOCKCHAIN");
    }

    #[test]
    fn injected_taxonomy_replaces_default() {
        let t = Taxonomy::new(&[("ml", "Machine Learning")]).unwrap();
        let n = Normalizer::new(t, true);
        assert_eq!(n.normalize("ML"), "MACHINE LEARNING");
        // Not part of this taxonomy anymore.
        assert_eq!(n.normalize("Web developer"), "WEB DEVELOPER");
    }

    #[test]
    fn taxonomy_rejects_conflicts() {
        let res = Taxonomy::new(&[("ML", "Machine Learning"), ("ml", "Meta Learning")]);
        assert_eq!(
            res,
            Err(TallyErrors::ConflictingSynonym {
                synonym: "ml".to_string(),
                first: "Machine Learning".to_string(),
                second: "Meta Learning".to_string(),
            })
        );
        // The same mapping twice is fine.
        let t = Taxonomy::new(&[("ML", "Machine Learning"), ("ml", "Machine Learning")]).unwrap();
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn taxonomy_rejects_blanks() {
        assert_eq!(Taxonomy::new(&[("  ", "X")]), Err(TallyErrors::EmptySynonym));
        assert_eq!(
            Taxonomy::new(&[("x", " ")]),
            Err(TallyErrors::EmptyLabel("x".to_string()))
        );
    }

    #[test]
    fn default_taxonomy_keys_are_folded() {
        for (k, _) in Taxonomy::default_taxonomy().pairs() {
            assert_eq!(fold(k), k);
        }
    }
}
