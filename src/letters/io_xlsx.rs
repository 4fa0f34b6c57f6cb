// Primitives for reading the tables from Excel workbooks.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use log::debug;
use snafu::prelude::*;

use servel_letters::SiteRecord;

use crate::letters::io_common::*;
use crate::letters::{EmptyExcelSnafu, GenResult, MissingColumnSnafu, OpeningExcelSnafu};

/// Reads the first worksheet as rows of strings.
fn read_table(path: &str) -> GenResult<Vec<Vec<String>>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = workbook
        .worksheet_range_at(0)
        .context(EmptyExcelSnafu { path })?
        .context(OpeningExcelSnafu { path })?;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for row in wrange.rows() {
        rows.push(row.iter().map(cell_to_string).collect());
    }
    debug!("read_table: {:?}: {} rows", path, rows.len());
    Ok(rows)
}

// Site codes are regularly typed as numbers in spreadsheets; render them
// without the trailing ".0" a float would carry.
fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Excel flavour of the responses loader; same header rules as the CSV one.
pub fn read_responses_xlsx(path: &str) -> GenResult<Vec<(String, String)>> {
    let rows = read_table(path)?;
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
            for row in rows.iter() {
                let case = field_at(row, Some(0));
                let response = field_at(row, Some(1));
                if !case.is_empty() && !response.is_empty() {
                    entries.push((case, response));
                }
            }
        }
    }
    Ok(entries)
}

/// Excel flavour of the sites loader; same header rules as the CSV one.
pub fn read_sites_xlsx(path: &str) -> GenResult<Vec<SiteRecord>> {
    let rows = read_table(path)?;
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
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cells_lose_the_float_suffix() {
        assert_eq!(cell_to_string(&DataType::Float(1001.0)), "1001");
        assert_eq!(cell_to_string(&DataType::Int(7)), "7");
        assert_eq!(cell_to_string(&DataType::Float(1.5)), "1.5");
    }

    #[test]
    fn text_and_empty_cells_pass_through() {
        assert_eq!(
            cell_to_string(&DataType::String("Escuela A".to_string())),
            "Escuela A"
        );
        assert_eq!(cell_to_string(&DataType::Empty), "");
    }
}
