use log::{debug, info, warn};

use interest_tally::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::report::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of CSV file {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Excel file {path} has no content"))]
    EmptyExcel { path: String },
    #[snafu(display("Cannot choose a worksheet in {path}: {message}"))]
    MissingWorksheet { path: String, message: String },
    #[snafu(display("Column {column:?} not found in the header of {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("Missing student name on line {lineno} of {path}"))]
    MissingName { path: String, lineno: usize },
    #[snafu(display("Unknown input type {provider:?}, expected csv or xlsx"))]
    UnknownProvider { provider: String },
    #[snafu(display("Unknown count basis {value:?}, expected perStudent or perMention"))]
    InvalidCountBasis { value: String },
    #[snafu(display("No roster to read: use --input or a configuration file with roster sources"))]
    MissingInput {},
    #[snafu(display("Invalid tally options: {source}"))]
    Tally { source: TallyErrors },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary {path}"))]
    ReferenceMismatch { path: String },
}

pub type ReportResult<T> = Result<T, ReportError>;

pub type BReportResult<T> = Result<T, Box<ReportError>>;

/// Everything needed to produce one report, once the configuration file and the
/// command line have been merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportSettings {
    pub report_name: Option<String>,
    pub sources: Vec<RosterSource>,
    pub taxonomy: Taxonomy,
    pub rules: TallyRules,
    pub selected_interests: Vec<String>,
    pub out: Option<String>,
    pub reference: Option<String>,
}

/// Merges the configuration file (if any) with the command line arguments.
/// The arguments take precedence.
pub fn build_settings(args: &Args) -> BReportResult<ReportSettings> {
    let (config, root_dir) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path.as_str())
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            (config, root)
        }
        None => (ReportConfig::default(), PathBuf::new()),
    };

    let mut sources: Vec<RosterSource> = match &args.input {
        Some(input) => vec![RosterSource {
            provider: args.input_type.clone().unwrap_or_else(|| "csv".to_string()),
            file_path: input.clone(),
            name_column: None,
            interest_columns: None,
            excel_worksheet_name: None,
        }],
        None => config
            .roster_sources
            .iter()
            .map(|s| RosterSource {
                file_path: resolve_path(&root_dir, &s.file_path),
                ..s.clone()
            })
            .collect(),
    };
    if sources.is_empty() {
        return Err(Box::new(ReportError::MissingInput {}));
    }
    for s in sources.iter_mut() {
        if let Some(t) = &args.input_type {
            s.provider = t.clone();
        }
        if args.name_column.is_some() {
            s.name_column = args.name_column.clone();
        }
        if args.interest_columns.is_some() {
            s.interest_columns = args.interest_columns.clone();
        }
        if args.excel_worksheet_name.is_some() {
            s.excel_worksheet_name = args.excel_worksheet_name.clone();
        }
        // Fail early on unknown formats.
        s.provider()?;
    }

    let mut rules = config.rules.tally_rules()?;
    if let Some(basis) = &args.count_basis {
        rules.count_basis = parse_count_basis(basis)?;
    }
    if args.top_n.is_some() {
        rules.top_n = args.top_n;
    }
    if args.mixed_case {
        rules.uppercase_output = false;
    }

    let taxonomy = config.taxonomy()?;
    let normalizer = Normalizer::new(taxonomy.clone(), rules.uppercase_output);
    let raw_selection: Vec<String> = args
        .interest
        .clone()
        .or_else(|| config.selected_interests.clone())
        .unwrap_or_default();
    let mut selected_interests: Vec<String> = Vec::new();
    for s in raw_selection.iter().flat_map(|s| split_interest_field(s)) {
        let interest = normalizer.normalize(s);
        if !selected_interests.contains(&interest) {
            selected_interests.push(interest);
        }
    }

    let out = args
        .out
        .clone()
        .or_else(|| config.output_settings.output_path.clone());

    Ok(ReportSettings {
        report_name: config.output_settings.report_name.clone(),
        sources,
        taxonomy,
        rules,
        selected_interests,
        out,
        reference: args.reference.clone(),
    })
}

fn resolve_path(root_dir: &Path, file_path: &str) -> String {
    let p: PathBuf = [root_dir, Path::new(file_path)].iter().collect();
    p.as_path().display().to_string()
}

fn read_roster_data(source: &RosterSource) -> BReportResult<Vec<StudentRecord>> {
    info!("Attempting to read roster file {:?}", source.file_path);
    match source.provider()? {
        Provider::Csv => io_csv::read_csv_roster(&source.file_path, source),
        Provider::Xlsx => io_xlsx::read_xlsx_roster(&source.file_path, source),
    }
}

fn frequencies_to_json(entries: &[(String, u64)]) -> Vec<JSValue> {
    entries
        .iter()
        .map(|(name, count)| json!({"interest": name, "count": count}))
        .collect()
}

// The merged row is flagged so that it is not mistaken for an interest called "Other".
fn top_n_to_json(rows: &[TallyEntry]) -> Vec<JSValue> {
    rows.iter()
        .map(|r| match r {
            TallyEntry::Interest(name, count) => json!({"interest": name, "count": count}),
            TallyEntry::Other(count) => {
                json!({"interest": r.label(), "count": count, "other": true})
            }
        })
        .collect()
}

fn profiles_to_json(profiles: &[&StudentInterestProfile]) -> Vec<JSValue> {
    profiles
        .iter()
        .map(|p| {
            let interests: Vec<&String> = p.interests.iter().collect();
            json!({"name": p.name, "interests": interests})
        })
        .collect()
}

/// The summary handed over to the presentation layer.
pub fn build_summary_js(settings: &ReportSettings, report: &InterestReport) -> JSValue {
    let source_names: Vec<String> = settings
        .sources
        .iter()
        .map(|s| io_common::simplify_file_name(&s.file_path))
        .collect();
    let mut js = json!({
        "config": {
            "reportName": settings.report_name,
            "sources": source_names,
            "countBasis": count_basis_name(settings.rules.count_basis),
            "uppercaseOutput": settings.rules.uppercase_output,
            "topN": settings.rules.top_n,
        },
        "metrics": {
            "totalStudents": report.total_students,
            "totalInterests": report.total_interests,
        },
    });

    let frequencies = filter_frequencies(&report.frequencies, &settings.selected_interests);
    js["frequencies"] = JSValue::Array(frequencies_to_json(&frequencies.sorted()));
    if let Some(rows) = &report.top_n {
        js["topN"] = JSValue::Array(top_n_to_json(rows));
    }
    if !settings.selected_interests.is_empty() {
        js["selectedInterests"] = json!(settings.selected_interests);
    }
    let profiles = filter_profiles(&report.profiles, &settings.selected_interests);
    js["profiles"] = JSValue::Array(profiles_to_json(&profiles));
    js
}

fn write_summary(out: &Option<String>, pretty_js: &str) -> BReportResult<()> {
    match out.as_deref() {
        None | Some("") | Some("stdout") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty_js).context(WritingOutputSnafu { path })?;
        }
    }
    Ok(())
}

/// Loads the rosters, runs the tally and returns the summary.
pub fn run_report_settings(settings: &ReportSettings) -> BReportResult<JSValue> {
    debug!("run_report_settings: {:?}", settings);
    let mut records: Vec<StudentRecord> = Vec::new();
    for source in settings.sources.iter() {
        let mut file_data = read_roster_data(source)?;
        records.append(&mut file_data);
    }
    info!("Read {} students in total", records.len());

    let report = run_interest_stats(&records, &settings.taxonomy, &settings.rules)
        .context(TallySnafu {})?;
    for s in settings.selected_interests.iter() {
        if report.frequencies.get(s).is_none() {
            warn!("Selected interest {:?} does not appear in the roster", s);
        }
    }

    // Assemble the final json
    let result_js = build_summary_js(settings, &report);
    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_summary(&settings.out, &pretty_js)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &settings.reference {
        check_reference(summary_p, &pretty_js)?;
    }
    Ok(result_js)
}

fn check_reference(summary_p: &str, pretty_js: &str) -> BReportResult<()> {
    let summary_ref = read_summary(summary_p)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js, "\n");
        return Err(Box::new(ReportError::ReferenceMismatch {
            path: summary_p.to_string(),
        }));
    }
    info!("Summary matches the reference {:?}", summary_p);
    Ok(())
}

pub fn run_report(args: &Args) -> BReportResult<()> {
    let settings = build_settings(args)?;
    run_report_settings(&settings)?;
    Ok(())
}

#[cfg(test)]
fn test_data_path(test_name: &str, file_name: &str) -> String {
    format!(
        "{}/testdata/{}/{}",
        env!("CARGO_MANIFEST_DIR"),
        test_name,
        file_name
    )
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    use clap::Parser;
    let _ = env_logger::builder().is_test(true).try_init();
    let config_p = test_data_path(test_name, &format!("{}_config.json", test_name));
    let summary_p = test_data_path(test_name, &format!("{}_expected_summary.json", test_name));
    let args = Args::parse_from([
        "interest-report",
        "--config",
        config_p.as_str(),
        "--reference",
        summary_p.as_str(),
    ]);
    if let Err(e) = run_report(&args) {
        panic!("Test {} failed: {}", test_name, e);
    }
}
