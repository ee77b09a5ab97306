pub use crate::config::*;
use crate::{run_interest_stats, Taxonomy};

/// A builder for adding student records one at a time.
///
/// ```
/// pub use interest_tally::builder::Builder;
/// pub use interest_tally::TallyRules;
/// # use interest_tally::TallyErrors;
///
/// let mut builder = Builder::new(&TallyRules::DEFAULT_RULES)?;
///
/// builder.add_record("Anna", &["AI/ML, Cloud computing".to_string(), "".to_string()])?;
/// builder.add_record("Bob", &["ai/ml".to_string()])?;
///
/// let report = builder.build()?;
/// assert_eq!(report.frequencies.get("AI/ML"), Some(2));
///
/// # Ok::<(), TallyErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: TallyRules,
    pub(crate) _taxonomy: Taxonomy,
    pub(crate) _records: Vec<StudentRecord>,
}

impl Builder {
    /// A builder using the default taxonomy.
    pub fn new(rules: &TallyRules) -> Result<Builder, TallyErrors> {
        rules.validate()?;
        Ok(Builder {
            _rules: rules.clone(),
            _taxonomy: Taxonomy::default_taxonomy(),
            _records: Vec::new(),
        })
    }

    /// Replaces the taxonomy. The records added so far are dropped.
    pub fn taxonomy(self, taxonomy: Taxonomy) -> Result<Builder, TallyErrors> {
        Ok(Builder {
            _rules: self._rules,
            _taxonomy: taxonomy,
            _records: Vec::new(),
        })
    }

    /// Adds a student.
    ///
    /// fields: the content of each interest column. Each field may contain
    /// several comma-separated interests, or nothing at all.
    pub fn add_record(&mut self, name: &str, fields: &[String]) -> Result<(), TallyErrors> {
        self.add_record_2(&StudentRecord {
            name: name.to_string(),
            raw_interests: fields.iter().map(|f| Some(f.clone())).collect(),
        })
    }

    /// Adds a record read from a roster.
    ///
    /// The record must have at least one interest cell, even an empty one.
    pub fn add_record_2(&mut self, record: &StudentRecord) -> Result<(), TallyErrors> {
        if record.raw_interests.is_empty() {
            return Err(TallyErrors::NoInterestCells(record.name.clone()));
        }
        self._records.push(record.clone());
        Ok(())
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self._records
    }

    pub fn build(&self) -> Result<InterestReport, TallyErrors> {
        run_interest_stats(&self._records, &self._taxonomy, &self._rules)
    }
}
