pub mod builder;
mod cache;
mod config;
pub mod manual;
mod taxonomy;

use log::{debug, info, warn};

use std::collections::{HashMap, HashSet};

pub use crate::cache::*;
pub use crate::config::*;
pub use crate::taxonomy::*;

/// Splits the content of one interest cell into its tokens.
///
/// Tokens are separated by commas and trimmed. Blank tokens are dropped.
pub fn split_interest_field(field: &str) -> impl Iterator<Item = &str> {
    field.split(',').map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Builds the profile of a single student.
pub fn build_profile(record: &StudentRecord, normalizer: &Normalizer) -> StudentInterestProfile {
    let mentions: Vec<String> = record
        .raw_interests
        .iter()
        .flatten()
        .flat_map(|field| split_interest_field(field))
        .map(|token| normalizer.normalize(token))
        .collect();
    let interests = mentions.iter().cloned().collect();
    StudentInterestProfile {
        name: record.name.clone(),
        mentions,
        interests,
    }
}

/// Builds one profile per record, in the order of the records.
pub fn build_profiles(
    records: &[StudentRecord],
    normalizer: &Normalizer,
) -> Vec<StudentInterestProfile> {
    records
        .iter()
        .map(|r| {
            let p = build_profile(r, normalizer);
            debug!(
                "build_profiles: {:?}: {:?} -> {:?}",
                p.name, r.raw_interests, p.interests
            );
            p
        })
        .collect()
}

/// Counts the interests over all the profiles.
///
/// With [CountBasis::PerStudent], a student contributes at most once to each interest.
pub fn count_frequencies(
    profiles: &[StudentInterestProfile],
    basis: CountBasis,
) -> InterestFrequencyTable {
    // Position of each interest in the table.
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, u64)> = Vec::new();
    for p in profiles.iter() {
        // The mentions are scanned in both cases so that the first-seen order
        // does not depend on the basis.
        let mut seen: HashSet<&str> = HashSet::new();
        for interest in p.mentions.iter() {
            let first_for_student = seen.insert(interest.as_str());
            let increment = match basis {
                CountBasis::PerMention => 1,
                CountBasis::PerStudent if first_for_student => 1,
                CountBasis::PerStudent => 0,
            };
            match positions.get(interest) {
                Some(idx) => counts[*idx].1 += increment,
                None => {
                    positions.insert(interest.clone(), counts.len());
                    counts.push((interest.clone(), increment));
                }
            }
        }
    }
    InterestFrequencyTable { counts }
}

/// Keeps the `n` interests with the highest counts and merges all the others
/// into a single [TallyEntry::Other] row, placed last.
///
/// The `Other` row is only present if at least one interest was merged.
/// The sum of the counts is preserved.
pub fn top_n_with_other(table: &InterestFrequencyTable, n: usize) -> Vec<TallyEntry> {
    let sorted = table.sorted();
    let mut res: Vec<TallyEntry> = sorted
        .iter()
        .take(n)
        .map(|(name, c)| TallyEntry::Interest(name.clone(), *c))
        .collect();
    if sorted.len() > n {
        let rest: u64 = sorted.iter().skip(n).map(|(_, c)| *c).sum();
        res.push(TallyEntry::Other(rest));
    }
    res
}

/// The profiles that contain at least one of the selected interests.
/// All the profiles are returned when nothing is selected.
pub fn filter_profiles<'a>(
    profiles: &'a [StudentInterestProfile],
    selected: &[String],
) -> Vec<&'a StudentInterestProfile> {
    profiles
        .iter()
        .filter(|p| selected.is_empty() || selected.iter().any(|s| p.has_interest(s)))
        .collect()
}

/// Restricts a frequency table to the selected interests, keeping its order.
pub fn filter_frequencies(
    table: &InterestFrequencyTable,
    selected: &[String],
) -> InterestFrequencyTable {
    if selected.is_empty() {
        return table.clone();
    }
    InterestFrequencyTable {
        counts: table
            .counts
            .iter()
            .filter(|(name, _)| selected.contains(name))
            .cloned()
            .collect(),
    }
}

/// Number of distinct names among the profiles.
///
/// Profiles without a name are not counted.
pub fn count_distinct_students(profiles: &[StudentInterestProfile]) -> usize {
    let names: HashSet<&str> = profiles
        .iter()
        .map(|p| p.name.as_str())
        .filter(|n| !n.is_empty())
        .collect();
    names.len()
}

/// Runs the whole pipeline on a roster.
///
/// Arguments:
/// * `records` the rows of the roster, in input order
/// * `taxonomy` the synonyms used to normalize the interests
/// * `rules` the options that control the labels and the counts
pub fn run_interest_stats(
    records: &[StudentRecord],
    taxonomy: &Taxonomy,
    rules: &TallyRules,
) -> Result<InterestReport, TallyErrors> {
    info!(
        "Processing {:?} records, {:?} synonyms, rules: {:?}",
        records.len(),
        taxonomy.len(),
        rules
    );
    rules.validate()?;

    let normalizer = Normalizer::new(taxonomy.clone(), rules.uppercase_output);
    let profiles = build_profiles(records, &normalizer);

    let total_students = count_distinct_students(&profiles);
    let unnamed = profiles.iter().filter(|p| p.name.is_empty()).count();
    if unnamed > 0 {
        warn!(
            "run_interest_stats: {} records have no name and are not counted as students",
            unnamed
        );
    }
    let named = profiles.len() - unnamed;
    if total_students < named {
        warn!(
            "run_interest_stats: {} records share their name with another record",
            named - total_students
        );
    }
    let empty_profiles = profiles.iter().filter(|p| p.interests.is_empty()).count();
    if empty_profiles > 0 {
        info!("{} students did not list any interest", empty_profiles);
    }

    let frequencies = count_frequencies(&profiles, rules.count_basis);
    for (name, count) in frequencies.sorted().iter() {
        info!("Interest: {:>5} {}", count, name);
    }

    let top_n = rules.top_n.map(|n| top_n_with_other(&frequencies, n));
    if let Some(rows) = top_n.as_ref() {
        debug!("run_interest_stats: top {:?}: {:?}", rules.top_n, rows);
    }

    Ok(InterestReport {
        total_students,
        total_interests: frequencies.len(),
        profiles,
        frequencies,
        top_n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn normalizer() -> Normalizer {
        Normalizer::new(Taxonomy::default_taxonomy(), true)
    }

    fn table(entries: &[(&str, u64)]) -> InterestFrequencyTable {
        let v: Vec<(String, u64)> = entries.iter().map(|(s, c)| (s.to_string(), *c)).collect();
        InterestFrequencyTable::from_entries(&v)
    }

    #[test]
    fn split_drops_blank_tokens() {
        let tokens: Vec<&str> = split_interest_field(",, ,").collect();
        assert!(tokens.is_empty());
        let tokens: Vec<&str> = split_interest_field(" AI/ML ,Cloud computing,").collect();
        assert_eq!(tokens, vec!["AI/ML", "Cloud computing"]);
    }

    #[test]
    fn blank_field_gives_empty_profile() {
        let r = StudentRecord::new("Ana", &[",, ,", "", "   "]);
        let p = build_profile(&r, &normalizer());
        assert!(p.interests.is_empty());
        assert!(p.mentions.is_empty());
    }

    #[test]
    fn profile_deduplicates_synonyms() {
        let r = StudentRecord::new("Ana", &["AI/ML", "ai/ml", ""]);
        let p = build_profile(&r, &normalizer());
        assert_eq!(p.interests.len(), 1);
        assert!(p.has_interest("AI/ML"));
        assert_eq!(p.mentions, vec!["AI/ML", "AI/ML"]);
    }

    #[test]
    fn missing_cells_are_empty() {
        let r = StudentRecord {
            name: "Ben".to_string(),
            raw_interests: vec![None, Some("Big Data".to_string()), None, None],
        };
        let p = build_profile(&r, &normalizer());
        assert_eq!(p.interests.iter().collect::<Vec<_>>(), vec!["BIG DATA"]);
    }

    #[test]
    fn counts_students_not_mentions() {
        let records = vec![
            StudentRecord::new("A", &["Web developer", "web development, Web Development"]),
            StudentRecord::new("B", &["Web Development", "", "", ""]),
            StudentRecord::new("C", &["AI/ML", "", "", "web developer"]),
            StudentRecord::new("D", &["AI/ML"]),
        ];
        let profiles = build_profiles(&records, &normalizer());
        let t = count_frequencies(&profiles, CountBasis::PerStudent);
        assert_eq!(t.get("WEB DEVELOPMENT"), Some(3));
        assert_eq!(t.get("AI/ML"), Some(2));
        assert_eq!(t.len(), 2);

        let t = count_frequencies(&profiles, CountBasis::PerMention);
        assert_eq!(t.get("WEB DEVELOPMENT"), Some(5));
        assert_eq!(t.get("AI/ML"), Some(2));
    }

    #[test]
    fn first_seen_order_is_kept() {
        let records = vec![
            StudentRecord::new("A", &["Robotics", "AI/ML"]),
            StudentRecord::new("B", &["AI/ML, Robotics"]),
            StudentRecord::new("C", &["IoT"]),
        ];
        let profiles = build_profiles(&records, &normalizer());
        let t = count_frequencies(&profiles, CountBasis::PerStudent);
        let names: Vec<&str> = t.entries().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["ROBOTICS", "AI/ML", "IOT"]);
        // Ties keep that order once sorted.
        let sorted: Vec<String> = t.sorted().into_iter().map(|(n, _)| n).collect();
        assert_eq!(sorted, vec!["ROBOTICS", "AI/ML", "IOT"]);
    }

    #[test]
    fn unknown_interest_is_counted() {
        let records = vec![
            StudentRecord::new("A", &["Blockchain"]),
            StudentRecord::new("B", &["BLOCKCHAIN", "blockchain"]),
            StudentRecord::new("C", &["AI/ML"]),
        ];
        let profiles = build_profiles(&records, &normalizer());
        let t = count_frequencies(&profiles, CountBasis::PerStudent);
        assert_eq!(t.get("BLOCKCHAIN"), Some(2));
    }

    #[test]
    fn top_n_merges_the_tail() {
        let t = table(&[
            ("A", 10),
            ("B", 8),
            ("C", 6),
            ("D", 5),
            ("E", 4),
            ("F", 3),
            ("G", 2),
            ("H", 1),
            ("I", 1),
        ]);
        let rows = top_n_with_other(&t, 7);
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0], TallyEntry::Interest("A".to_string(), 10));
        assert_eq!(rows[6], TallyEntry::Interest("G".to_string(), 2));
        assert_eq!(rows[7], TallyEntry::Other(2));
        assert_eq!(rows[7].label(), "OTHER");
        let total: u64 = rows.iter().map(|r| r.count()).sum();
        assert_eq!(total, 36);
        assert_eq!(total, t.total());
        // The table is left untouched.
        assert_eq!(t.len(), 9);
    }

    #[test]
    fn top_n_without_tail() {
        let t = table(&[("B", 1), ("A", 3)]);
        let rows = top_n_with_other(&t, 7);
        assert_eq!(
            rows,
            vec![
                TallyEntry::Interest("A".to_string(), 3),
                TallyEntry::Interest("B".to_string(), 1)
            ]
        );
    }

    #[test]
    fn real_other_interest_does_not_merge_with_bucket() {
        let t = table(&[("A", 3), ("OTHER", 2), ("C", 1)]);
        let rows = top_n_with_other(&t, 2);
        assert_eq!(rows[1], TallyEntry::Interest("OTHER".to_string(), 2));
        assert_eq!(rows[2], TallyEntry::Other(1));
    }

    #[test]
    fn filters() {
        let records = vec![
            StudentRecord::new("A", &["AI/ML", "IoT"]),
            StudentRecord::new("B", &["Big Data"]),
            StudentRecord::new("C", &["iot"]),
        ];
        let profiles = build_profiles(&records, &normalizer());
        let selected = vec!["IOT".to_string()];
        let names: Vec<&str> = filter_profiles(&profiles, &selected)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(filter_profiles(&profiles, &[]).len(), 3);

        let t = count_frequencies(&profiles, CountBasis::PerStudent);
        let ft = filter_frequencies(&t, &["BIG DATA".to_string(), "AI/ML".to_string()]);
        assert_eq!(
            ft.entries(),
            &[("AI/ML".to_string(), 1), ("BIG DATA".to_string(), 1)]
        );
    }

    #[test]
    fn report_metrics() {
        init();
        let records = vec![
            StudentRecord::new("A", &["AI/ML", "Cloud computing"]),
            StudentRecord::new("B", &["cloud Computing", ""]),
            StudentRecord::new("C", &[""]),
        ];
        let rules = TallyRules {
            top_n: Some(1),
            ..TallyRules::DEFAULT_RULES
        };
        let report = run_interest_stats(&records, &Taxonomy::default_taxonomy(), &rules).unwrap();
        assert_eq!(report.total_students, 3);
        assert_eq!(report.total_interests, 2);
        assert_eq!(report.frequencies.get("CLOUD COMPUTING"), Some(2));
        assert_eq!(
            report.top_n,
            Some(vec![
                TallyEntry::Interest("CLOUD COMPUTING".to_string(), 2),
                TallyEntry::Other(1)
            ])
        );
    }

    #[test]
    fn unnamed_students_are_not_counted() {
        init();
        let records = vec![
            StudentRecord::new("", &["AI/ML"]),
            StudentRecord::new("", &["IoT"]),
            StudentRecord::new("Asha", &["IoT"]),
        ];
        let report =
            run_interest_stats(&records, &Taxonomy::default_taxonomy(), &TallyRules::DEFAULT_RULES)
                .unwrap();
        assert_eq!(report.total_students, 1);
        assert_eq!(report.profiles.len(), 3);
        // Their interests still count.
        assert_eq!(report.frequencies.get("IOT"), Some(2));
        assert_eq!(report.frequencies.get("AI/ML"), Some(1));
    }

    #[test]
    fn duplicate_names_count_once() {
        let records = vec![
            StudentRecord::new("Asha", &["AI/ML"]),
            StudentRecord::new("Asha", &["IoT"]),
            StudentRecord::new("Ben", &[""]),
        ];
        let profiles = build_profiles(&records, &normalizer());
        assert_eq!(count_distinct_students(&profiles), 2);
    }

    #[test]
    fn report_is_idempotent() {
        init();
        let records = vec![
            StudentRecord::new("A", &["AI/ML, Robotics", "robotics"]),
            StudentRecord::new("B", &["Game developer"]),
        ];
        let taxonomy = Taxonomy::default_taxonomy();
        let r1 = run_interest_stats(&records, &taxonomy, &TallyRules::DEFAULT_RULES).unwrap();
        let r2 = run_interest_stats(&records, &taxonomy, &TallyRules::DEFAULT_RULES).unwrap();
        assert_eq!(r1, r2);
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let rules = TallyRules {
            top_n: Some(0),
            ..TallyRules::DEFAULT_RULES
        };
        let res = run_interest_stats(&[], &Taxonomy::default_taxonomy(), &rules);
        assert_eq!(res, Err(TallyErrors::InvalidTopN));
    }

    #[test]
    fn empty_roster() {
        let report =
            run_interest_stats(&[], &Taxonomy::default_taxonomy(), &TallyRules::DEFAULT_RULES)
                .unwrap();
        assert_eq!(report.total_students, 0);
        assert!(report.frequencies.is_empty());
        assert_eq!(report.top_n, None);
    }
}
