use calamine::DataType;

use crate::report::{
    config_reader::RosterSource,
    io_common::{locate_columns, make_record},
    *,
};

pub fn read_xlsx_roster(path: &str, source: &RosterSource) -> BReportResult<Vec<StudentRecord>> {
    let wrange = get_range(path, source)?;
    let mut rows = wrange.rows();
    let header = rows.next().context(EmptyExcelSnafu { path })?;
    debug!("read_xlsx_roster: header: {:?}", header);
    let res = read_xlsx_rows(header, rows, source, path)?;
    info!("Read {} students from {:?}", res.len(), path);
    Ok(res)
}

pub fn read_xlsx_rows<'a>(
    header: &[DataType],
    rows: impl Iterator<Item = &'a [DataType]>,
    source: &RosterSource,
    path: &str,
) -> BReportResult<Vec<StudentRecord>> {
    let header_names: Vec<Option<String>> = header
        .iter()
        .map(|dt| match dt {
            DataType::String(s) => Some(s.clone()),
            _ => None,
        })
        .collect();
    let cols = locate_columns(&header_names, source, path)?;

    let mut res: Vec<StudentRecord> = Vec::new();
    for (idx, row) in rows.enumerate() {
        // Excel rows start at 1 and the header is the first row.
        let lineno = idx + 2;
        if row.iter().all(|c| matches!(c, DataType::Empty)) {
            debug!("read_xlsx_rows: lineno: {:?}: skipping blank row", lineno);
            continue;
        }
        let name_cell = row
            .get(cols.name_idx)
            .context(MissingNameSnafu { path, lineno })?;
        let name = read_name_cell(name_cell).context(MissingNameSnafu { path, lineno })?;
        let raw_interests: Vec<Option<String>> = cols
            .interest_idxs
            .iter()
            .map(|i| row.get(*i).and_then(|c| read_interest_cell(c, lineno)))
            .collect();
        debug!(
            "read_xlsx_rows: lineno: {:?} name: {:?} interests: {:?}",
            lineno, name, &raw_interests
        );
        res.push(make_record(&name, raw_interests, lineno));
    }
    Ok(res)
}

// Numeric names happen with anonymized rosters (student ids).
fn read_name_cell(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) => Some(s.clone()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Float(f) => Some(f.to_string()),
        DataType::Empty => Some("".to_string()),
        _ => None,
    }
}

fn read_interest_cell(cell: &DataType, lineno: usize) -> Option<String> {
    match cell {
        DataType::String(s) => Some(s.clone()),
        DataType::Empty => None,
        _ => {
            warn!(
                "read_interest_cell: line {}: ignoring non-text cell {:?}",
                lineno, cell
            );
            None
        }
    }
}

fn get_range(path: &str, source: &RosterSource) -> BReportResult<calamine::Range<DataType>> {
    let worksheet_name_o = source.excel_worksheet_name.clone();
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                message: format!("no worksheet named {:?}", worksheet_name),
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail().map_err(Box::new),
            [(worksheet_name, wrange)] => {
                debug!("get_range: path: {:?} worksheet: {:?}", &path, &worksheet_name);
                Ok(wrange.clone())
            }
            _ => MissingWorksheetSnafu {
                path,
                message: "too many worksheets, the worksheet name must be provided",
            }
            .fail()
            .map_err(Box::new),
        }
    }
}
