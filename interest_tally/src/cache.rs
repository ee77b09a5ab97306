use log::debug;
use std::collections::HashMap;

use crate::{run_interest_stats, InterestReport, StudentRecord, TallyErrors, TallyRules, Taxonomy};

/// A stable fingerprint of everything that determines a report.
///
/// Two calls with the same roster, taxonomy and rules return the same value.
pub fn fingerprint(records: &[StudentRecord], taxonomy: &Taxonomy, rules: &TallyRules) -> String {
    let mut data = String::new();
    data.push_str(&format!("{:?}\n", rules));
    for (synonym, label) in taxonomy.pairs() {
        data.push_str(&format!("{:?}={:?}\n", synonym, label));
    }
    for r in records.iter() {
        data.push_str(&format!("{:?}{:?}\n", r.name, r.raw_interests));
    }
    sha256::digest(data.as_str())
}

/// Keeps the reports already computed, so that loading the same roster again
/// does not run the pipeline a second time.
///
/// The pipeline is deterministic, so a cached report is always identical to a
/// freshly computed one.
#[derive(Debug, Default)]
pub struct ReportCache {
    reports: HashMap<String, InterestReport>,
}

impl ReportCache {
    pub fn new() -> ReportCache {
        ReportCache::default()
    }

    pub fn get_or_compute(
        &mut self,
        records: &[StudentRecord],
        taxonomy: &Taxonomy,
        rules: &TallyRules,
    ) -> Result<InterestReport, TallyErrors> {
        let key = fingerprint(records, taxonomy, rules);
        if let Some(report) = self.reports.get(&key) {
            debug!("ReportCache: hit for {}", key);
            return Ok(report.clone());
        }
        debug!("ReportCache: miss for {}", key);
        let report = run_interest_stats(records, taxonomy, rules)?;
        self.reports.insert(key, report.clone());
        Ok(report)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn clear(&mut self) {
        self.reports.clear();
    }
}
