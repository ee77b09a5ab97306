use std::collections::HashMap;
use std::path::Path;

use crate::report::{config_reader::RosterSource, *};

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// The positions of the columns of interest in a row.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RosterColumns {
    pub name_idx: usize,
    pub interest_idxs: Vec<usize>,
}

/// Given the header of a file (names of each of the columns), and the names of the requested columns,
/// finds the mapping from each column name to a column index position.
pub fn get_col_index_mapping(
    req_col_names: &[String],
    header: &[Option<String>],
    path: &str,
) -> BReportResult<Vec<(usize, String)>> {
    // Spreadsheets exported from Windows tools sometimes start with a byte order mark.
    let col_names: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .rev()
        .filter_map(|(idx, x)| {
            x.as_ref()
                .map(|s| (s.trim_start_matches('\u{feff}').trim().to_string(), idx))
        })
        .collect();

    debug!("get_col_index_mapping: col_names: {:?}", col_names);

    let mut col_indexes: Vec<(usize, String)> = Vec::new();
    for cname in req_col_names {
        let idx = col_names
            .get(cname.trim())
            .context(MissingColumnSnafu {
                column: cname,
                path,
            })?;
        col_indexes.push((*idx, cname.clone()));
    }
    Ok(col_indexes)
}

pub fn locate_columns(
    header: &[Option<String>],
    source: &RosterSource,
    path: &str,
) -> BReportResult<RosterColumns> {
    let name_col = source.name_column();
    let name_idx = get_col_index_mapping(&[name_col], header, path)?[0].0;
    let interest_idxs = get_col_index_mapping(&source.interest_columns(), header, path)?
        .iter()
        .map(|(idx, _)| *idx)
        .collect();
    let cols = RosterColumns {
        name_idx,
        interest_idxs,
    };
    debug!("locate_columns: {:?}: {:?}", path, cols);
    Ok(cols)
}

/// Checks the name read for a row. Blank names are kept, but reported.
pub fn make_record(name: &str, raw_interests: Vec<Option<String>>, lineno: usize) -> StudentRecord {
    let name = name.trim();
    if name.is_empty() {
        warn!("make_record: line {}: the student has no name", lineno);
    }
    StudentRecord {
        name: name.to_string(),
        raw_interests,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cols: &[&str]) -> Vec<Option<String>> {
        cols.iter().map(|s| Some(s.to_string())).collect()
    }

    fn source() -> RosterSource {
        RosterSource {
            provider: "csv".to_string(),
            file_path: "roster.csv".to_string(),
            name_column: None,
            interest_columns: Some(vec!["I1".to_string(), "I2".to_string()]),
            excel_worksheet_name: None,
        }
    }

    #[test]
    fn columns_found_in_any_order() {
        let h = header(&["I2", "Email", "\u{feff}Name", "I1 "]);
        let cols = locate_columns(&h, &source(), "roster.csv").unwrap();
        assert_eq!(
            cols,
            RosterColumns {
                name_idx: 2,
                interest_idxs: vec![3, 0]
            }
        );
    }

    #[test]
    fn duplicate_header_uses_first_column() {
        let h = header(&["Name", "I1", "I2", "I1"]);
        let cols = locate_columns(&h, &source(), "roster.csv").unwrap();
        assert_eq!(cols.interest_idxs, vec![1, 2]);
    }

    #[test]
    fn missing_column_is_fatal() {
        let h = vec![Some("Name".to_string()), None, Some("I1".to_string())];
        let err = locate_columns(&h, &source(), "roster.csv").unwrap_err();
        match *err {
            ReportError::MissingColumn { column, path } => {
                assert_eq!(column, "I2");
                assert_eq!(path, "roster.csv");
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/data/fall/roster.csv"), "roster.csv");
        assert_eq!(simplify_file_name("roster.csv"), "roster.csv");
    }
}
