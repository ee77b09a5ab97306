// ********* Input data structures ***********

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::Display;

/// One row of the roster, as parsed by the readers.
///
/// Each entry of `raw_interests` is the content of one interest column.
/// `None` stands for a missing cell, or a cell that did not contain text; it
/// is treated exactly like an empty cell.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct StudentRecord {
    pub name: String,
    pub raw_interests: Vec<Option<String>>,
}

impl StudentRecord {
    /// Convenience constructor when all the cells are present.
    pub fn new(name: &str, fields: &[&str]) -> StudentRecord {
        StudentRecord {
            name: name.to_string(),
            raw_interests: fields.iter().map(|s| Some(s.to_string())).collect(),
        }
    }
}

// ******** Output data structures *********

/// The interests attributed to one student after normalization.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StudentInterestProfile {
    pub name: String,
    /// All the normalized tokens, in the order of the columns.
    /// The same interest may appear several times.
    pub mentions: Vec<String>,
    /// The distinct interests. Iteration is sorted, which is the display order.
    pub interests: BTreeSet<String>,
}

impl StudentInterestProfile {
    pub fn has_interest(&self, interest: &str) -> bool {
        self.interests.contains(interest)
    }
}

/// Counts per canonical interest.
///
/// The entries are kept in the order in which the interests were first seen
/// while scanning the profiles. This order is only used to keep sorting stable.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct InterestFrequencyTable {
    pub(crate) counts: Vec<(String, u64)>,
}

impl InterestFrequencyTable {
    /// Builds a table from precomputed counts. The order of the entries is kept.
    pub fn from_entries(counts: &[(String, u64)]) -> InterestFrequencyTable {
        InterestFrequencyTable {
            counts: counts.to_vec(),
        }
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.counts
    }

    pub fn get(&self, interest: &str) -> Option<u64> {
        self.counts
            .iter()
            .find(|(name, _)| name == interest)
            .map(|(_, c)| *c)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all the counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, c)| *c).sum()
    }

    /// The entries by decreasing count. Ties keep the first-seen order.
    pub fn sorted(&self) -> Vec<(String, u64)> {
        let mut res = self.counts.clone();
        // sort_by is stable
        res.sort_by(|a, b| b.1.cmp(&a.1));
        res
    }
}

/// One row of the top-N view.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum TallyEntry {
    Interest(String, u64),
    /// Everything that did not make it into the top N, merged together.
    Other(u64),
}

impl TallyEntry {
    pub const OTHER_LABEL: &'static str = "OTHER";

    pub fn label(&self) -> &str {
        match self {
            TallyEntry::Interest(name, _) => name.as_str(),
            TallyEntry::Other(_) => TallyEntry::OTHER_LABEL,
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            TallyEntry::Interest(_, c) => *c,
            TallyEntry::Other(c) => *c,
        }
    }
}

/// Everything a presentation layer needs.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InterestReport {
    pub profiles: Vec<StudentInterestProfile>,
    pub frequencies: InterestFrequencyTable,
    /// Number of distinct student names.
    pub total_students: usize,
    /// Number of distinct canonical interests.
    pub total_interests: usize,
    /// Present when the rules request a top-N view.
    pub top_n: Option<Vec<TallyEntry>>,
}

/// Errors that prevent the tally from being computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyErrors {
    /// A synonym in the taxonomy is blank once folded.
    EmptySynonym,
    /// The canonical label for this synonym is blank.
    EmptyLabel(String),
    /// The same folded synonym points to two different labels.
    ConflictingSynonym {
        synonym: String,
        first: String,
        second: String,
    },
    /// A top-N view needs at least one row.
    InvalidTopN,
    /// The record of this student has no interest cell at all.
    NoInterestCells(String),
}

impl Error for TallyErrors {}

impl Display for TallyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyErrors::EmptySynonym => write!(f, "taxonomy contains a blank synonym"),
            TallyErrors::EmptyLabel(s) => {
                write!(f, "taxonomy maps synonym {:?} to a blank label", s)
            }
            TallyErrors::ConflictingSynonym {
                synonym,
                first,
                second,
            } => write!(
                f,
                "taxonomy maps synonym {:?} to both {:?} and {:?}",
                synonym, first, second
            ),
            TallyErrors::InvalidTopN => write!(f, "the top-N view must keep at least one row"),
            TallyErrors::NoInterestCells(name) => {
                write!(f, "the record of student {:?} has no interest cells", name)
            }
        }
    }
}

// ********* Configuration **********

/// What a count means in the frequency table.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum CountBasis {
    /// Number of distinct students mentioning the interest.
    PerStudent,
    /// Number of mentions, a student repeating an interest counts several times.
    PerMention,
}

#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct TallyRules {
    /// Upper-case all the canonical labels.
    pub uppercase_output: bool,
    pub count_basis: CountBasis,
    /// If set, also compute the view that keeps the top N interests.
    pub top_n: Option<usize>,
}

impl TallyRules {
    pub const DEFAULT_RULES: TallyRules = TallyRules {
        uppercase_output: true,
        count_basis: CountBasis::PerStudent,
        top_n: None,
    };

    pub(crate) fn validate(&self) -> Result<(), TallyErrors> {
        match self.top_n {
            Some(0) => Err(TallyErrors::InvalidTopN),
            _ => Ok(()),
        }
    }
}

impl Default for TallyRules {
    fn default() -> Self {
        TallyRules::DEFAULT_RULES
    }
}
