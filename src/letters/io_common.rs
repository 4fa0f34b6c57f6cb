// Header handling shared by the CSV and Excel loaders.
//
// The source tables come from several hands and the column names drift
// accordingly (accents, renames). Matching is case-insensitive against a
// fixed list of known variants per field.

pub const CASE_COLUMNS: &[&str] = &["caso"];
pub const RESPONSE_COLUMNS: &[&str] = &["respuesta"];

pub const SITE_CODE_COLUMNS: &[&str] = &["codigo_rec", "codigo", "codigo_recinto"];
pub const REGION_COLUMNS: &[&str] = &["region", "región"];
pub const COMMUNE_COLUMNS: &[&str] = &["comuna", "comuna_res"];
pub const SITE_NAME_COLUMNS: &[&str] = &["recinto", "nombre", "recinto_nombre"];
pub const ADDRESS_COLUMNS: &[&str] = &["direccion", "dirección", "direccion_recinto"];

/// Finds the index of the first header matching one of the accepted
/// variants, comparing case-insensitively on trimmed names.
pub fn find_column(headers: &[String], options: &[&str]) -> Option<usize> {
    for o in options {
        let wanted = o.to_lowercase();
        if let Some(idx) = headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
        {
            return Some(idx);
        }
    }
    None
}

/// Returns the trimmed cell at `idx`, or the empty string when the row is
/// too short or no column was found.
pub fn field_at(row: &[String], idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(hs: &[&str]) -> Vec<String> {
        hs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn matches_headers_case_insensitively() {
        let hs = headers(&["Codigo_Rec", "REGION", "Comuna", "Recinto", "Direccion"]);
        assert_eq!(find_column(&hs, SITE_CODE_COLUMNS), Some(0));
        assert_eq!(find_column(&hs, REGION_COLUMNS), Some(1));
        assert_eq!(find_column(&hs, COMMUNE_COLUMNS), Some(2));
        assert_eq!(find_column(&hs, SITE_NAME_COLUMNS), Some(3));
        assert_eq!(find_column(&hs, ADDRESS_COLUMNS), Some(4));
    }

    #[test]
    fn matches_accented_variants() {
        let hs = headers(&["codigo", "Región", "comuna_res", "nombre", "Dirección"]);
        assert_eq!(find_column(&hs, REGION_COLUMNS), Some(1));
        assert_eq!(find_column(&hs, COMMUNE_COLUMNS), Some(2));
        assert_eq!(find_column(&hs, ADDRESS_COLUMNS), Some(4));
    }

    #[test]
    fn earlier_variant_wins() {
        // "codigo_rec" is preferred over "codigo" when both are present.
        let hs = headers(&["codigo", "codigo_rec"]);
        assert_eq!(find_column(&hs, SITE_CODE_COLUMNS), Some(1));
    }

    #[test]
    fn unknown_header_is_none() {
        let hs = headers(&["foo", "bar"]);
        assert_eq!(find_column(&hs, REGION_COLUMNS), None);
    }

    #[test]
    fn field_at_tolerates_short_rows() {
        let row = vec!["a".to_string(), " b ".to_string()];
        assert_eq!(field_at(&row, Some(1)), "b");
        assert_eq!(field_at(&row, Some(5)), "");
        assert_eq!(field_at(&row, None), "");
    }
}
