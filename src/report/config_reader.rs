use crate::report::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use std::collections::BTreeMap;

pub const DEFAULT_NAME_COLUMN: &str = "Name";

pub const DEFAULT_INTEREST_COLUMNS: [&str; 4] = [
    "Area_of_Interest_1",
    "Area_of_Interest_2",
    "Area_of_Interest_3",
    "Mention_Other_Area",
];

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "reportName")]
    pub report_name: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

/// The supported roster formats.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Xlsx,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RosterSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "nameColumn")]
    pub name_column: Option<String>,
    #[serde(rename = "interestColumns")]
    pub interest_columns: Option<Vec<String>>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl RosterSource {
    pub fn provider(&self) -> ReportResult<Provider> {
        match self.provider.as_str() {
            "csv" => Ok(Provider::Csv),
            "xlsx" | "excel" => Ok(Provider::Xlsx),
            x => UnknownProviderSnafu {
                provider: x.to_string(),
            }
            .fail(),
        }
    }

    pub fn name_column(&self) -> String {
        self.name_column
            .clone()
            .unwrap_or_else(|| DEFAULT_NAME_COLUMN.to_string())
    }

    pub fn interest_columns(&self) -> Vec<String> {
        match &self.interest_columns {
            Some(cols) if !cols.is_empty() => cols.clone(),
            _ => DEFAULT_INTEREST_COLUMNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportRules {
    #[serde(rename = "countBasis")]
    pub count_basis: Option<String>,
    #[serde(rename = "uppercaseOutput")]
    pub uppercase_output: Option<bool>,
    #[serde(rename = "topN")]
    pub top_n: Option<usize>,
}

impl ReportRules {
    pub fn tally_rules(&self) -> ReportResult<TallyRules> {
        let count_basis = match &self.count_basis {
            Some(s) => parse_count_basis(s)?,
            None => TallyRules::DEFAULT_RULES.count_basis,
        };
        Ok(TallyRules {
            uppercase_output: self
                .uppercase_output
                .unwrap_or(TallyRules::DEFAULT_RULES.uppercase_output),
            count_basis,
            top_n: self.top_n,
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "rosterSources", default)]
    pub roster_sources: Vec<RosterSource>,
    /// synonym -> canonical label. The built-in taxonomy is used when missing.
    pub taxonomy: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub rules: ReportRules,
    #[serde(rename = "selectedInterests")]
    pub selected_interests: Option<Vec<String>>,
}

impl ReportConfig {
    pub fn taxonomy(&self) -> ReportResult<Taxonomy> {
        match &self.taxonomy {
            Some(m) => {
                let pairs: Vec<(&String, &String)> = m.iter().collect();
                Taxonomy::new(&pairs).context(TallySnafu {})
            }
            None => Ok(Taxonomy::default_taxonomy()),
        }
    }
}

pub fn parse_count_basis(s: &str) -> ReportResult<CountBasis> {
    match s {
        "perStudent" | "per-student" => Ok(CountBasis::PerStudent),
        "perMention" | "per-mention" => Ok(CountBasis::PerMention),
        x => InvalidCountBasisSnafu {
            value: x.to_string(),
        }
        .fail(),
    }
}

pub fn count_basis_name(basis: CountBasis) -> &'static str {
    match basis {
        CountBasis::PerStudent => "perStudent",
        CountBasis::PerMention => "perMention",
    }
}

pub fn read_config(path: &str) -> BReportResult<ReportConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ReportConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> BReportResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
