// Primitives for reading the CSV tables.

use std::fs::File;
use std::io::{BufRead, BufReader};

use log::debug;
use snafu::prelude::*;

use servel_letters::SiteRecord;

use crate::letters::io_common::*;
use crate::letters::{
    CsvLineParseSnafu, CsvOpenSnafu, GenResult, MissingColumnSnafu, OpeningTableSnafu,
};

/// Guesses the delimiter from the first line: ';' when present (the export
/// convention of the desktop app), ',' otherwise.
fn sniff_delimiter(path: &str) -> GenResult<u8> {
    let f = File::open(path).context(OpeningTableSnafu { path })?;
    let mut first_line = String::new();
    BufReader::new(f)
        .read_line(&mut first_line)
        .context(OpeningTableSnafu { path })?;
    Ok(if first_line.contains(';') { b';' } else { b',' })
}

fn read_rows(path: &str) -> GenResult<Vec<Vec<String>>> {
    let delimiter = sniff_delimiter(path)?;
    debug!("read_rows: {:?} delimiter: {:?}", path, delimiter as char);
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu {})?;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for line_r in rdr.into_records() {
        let line = line_r.context(CsvLineParseSnafu {})?;
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }
    // Files exported with a UTF-8 BOM keep it glued to the first header.
    if let Some(first) = rows.first_mut() {
        if let Some(cell) = first.first_mut() {
            *cell = cell.trim_start_matches('\u{feff}').to_string();
        }
    }
    Ok(rows)
}

/// Reads the responses table: one (case, template) pair per row.
///
/// The `Caso`/`Respuesta` headers are matched case-insensitively. When they
/// are absent the first column is taken as the case and the second as the
/// template, every row included. Rows with an empty case or template are
/// dropped.
pub fn read_responses_csv(path: &str) -> GenResult<Vec<(String, String)>> {
    let rows = read_rows(path)?;
    let mut entries: Vec<(String, String)> = Vec::new();
    let headers = match rows.first() {
        Some(h) => h,
        None => return Ok(entries),
    };
    let case_idx = find_column(headers, CASE_COLUMNS);
    let response_idx = find_column(headers, RESPONSE_COLUMNS);
    match (case_idx, response_idx) {
        (Some(ci), Some(ri)) => {
            for row in rows[1..].iter() {
                let case = field_at(row, Some(ci));
                let response = field_at(row, Some(ri));
                if !case.is_empty() && !response.is_empty() {
                    entries.push((case, response));
                }
            }
        }
        _ => {
            // No recognized header row. Fall back to the first two columns,
            // first row included.
            for row in rows.iter() {
                let case = field_at(row, Some(0));
                let response = field_at(row, Some(1));
                if !case.is_empty() && !response.is_empty() {
                    entries.push((case, response));
                }
            }
        }
    }
    debug!("read_responses_csv: {} entries", entries.len());
    Ok(entries)
}

/// Reads the polling-location table.
///
/// The site-code column is required; the other columns are optional and
/// default to empty fields. Rows without a site code are dropped.
pub fn read_sites_csv(path: &str) -> GenResult<Vec<SiteRecord>> {
    let rows = read_rows(path)?;
    let headers = match rows.first() {
        Some(h) => h,
        None => return Ok(Vec::new()),
    };
    let code_idx = find_column(headers, SITE_CODE_COLUMNS).context(MissingColumnSnafu {
        path,
        column: SITE_CODE_COLUMNS[0],
    })?;
    let region_idx = find_column(headers, REGION_COLUMNS);
    let commune_idx = find_column(headers, COMMUNE_COLUMNS);
    let name_idx = find_column(headers, SITE_NAME_COLUMNS);
    let address_idx = find_column(headers, ADDRESS_COLUMNS);

    let mut records: Vec<SiteRecord> = Vec::new();
    for row in rows[1..].iter() {
        let code = field_at(row, Some(code_idx));
        if code.is_empty() {
            continue;
        }
        records.push(SiteRecord {
            code,
            name: field_at(row, name_idx),
            address: field_at(row, address_idx),
            commune: field_at(row, commune_idx),
            region: field_at(row, region_idx),
        });
    }
    debug!("read_sites_csv: {} records", records.len());
    Ok(records)
}
