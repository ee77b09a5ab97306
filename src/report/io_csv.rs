// Primitives for reading CSV files.

use std::io::Read;

use crate::report::{
    config_reader::RosterSource,
    io_common::{locate_columns, make_record},
    *,
};

pub fn read_csv_roster(path: &str, source: &RosterSource) -> BReportResult<Vec<StudentRecord>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        // Short rows are accepted, the missing cells are treated as empty.
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    read_csv_records(rdr, source, path)
}

pub fn read_csv_records<R: Read>(
    mut rdr: csv::Reader<R>,
    source: &RosterSource,
    path: &str,
) -> BReportResult<Vec<StudentRecord>> {
    let header: Vec<Option<String>> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1usize })?
        .iter()
        .map(|s| Some(s.to_string()))
        .collect();
    debug!("read_csv_records: header: {:?}", header);
    let cols = locate_columns(&header, source, path)?;

    let mut res: Vec<StudentRecord> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        let name = line
            .get(cols.name_idx)
            .context(MissingNameSnafu { path, lineno })?;
        let raw_interests: Vec<Option<String>> = cols
            .interest_idxs
            .iter()
            .map(|i| line.get(*i).map(|s| s.to_string()))
            .collect();
        debug!(
            "read_csv_records: lineno: {:?} name: {:?} interests: {:?}",
            lineno, name, &raw_interests
        );
        res.push(make_record(name, raw_interests, lineno));
    }
    info!("Read {} students from {:?}", res.len(), path);
    Ok(res)
}
