/*!
Core logic for the SERVEL complaint-response letter generator.

Two pure, stateless components do the real work: the RUT parser
([`parse_rut`]) and the template renderer ([`render_letter`]). The
[`generate`] pipeline ties them together with the pre-render validation
that the hosting front end relies on: it either produces a fully rendered
letter or the complete list of validation failures, and it never panics on
user input.

The lookup tables ([`TemplateSet`], [`SiteDirectory`]) are built by the
loading layer (the `servelgen` binary, or any other host) and handed in;
the core holds no files, no clock and no mutable state.
*/

mod config;
pub mod rut;
pub mod template;

use log::{debug, info};

pub use crate::config::*;
pub use crate::rut::{parse_rut, ParsedRut};
pub use crate::template::render_letter;

/// A successfully rendered letter, with the fields the registry needs.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GeneratedLetter {
    pub text: String,
    pub rut: ParsedRut,
    /// The case identifier, as requested (exact string).
    pub case: String,
    /// The commune of the resolved site, for the registry row.
    pub commune: String,
    pub claim_number: String,
}

impl GeneratedLetter {
    /// Assembles the registry row for this letter. The timestamp is
    /// supplied by the caller; the core does not read the clock.
    pub fn log_row(&self, timestamp: &str) -> LogRow {
        LogRow {
            claim_number: self.claim_number.clone(),
            timestamp: timestamp.to_string(),
            case: display_case(&self.case),
            commune: self.commune.clone(),
            rut_body: self.rut.body.clone(),
            check_digit: self.rut.check_digit.to_string(),
            text: self.text.clone(),
        }
    }
}

/// The display form of a case identifier.
///
/// Purely numeric labels are coerced to their integer form (`"05"` becomes
/// `"5"`); anything else, including dotted sub-cases like `"5.1"`, is kept
/// verbatim. Only display and logging use this; lookups always compare
/// exact strings.
pub fn display_case(case: &str) -> String {
    if !case.is_empty() && case.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = case.parse::<u64>() {
            return n.to_string();
        }
    }
    case.to_string()
}

/// Validates a request and renders the matching template.
///
/// Every applicable failure is collected before returning, so the caller
/// can present them all at once: a missing claim number, an invalid RUT,
/// an unknown case, an unknown site code, and the missing date/origin
/// extras when the case is exactly `"5"`. The renderer runs only when the
/// request is fully valid; no partial output is ever produced.
///
/// Empty lookup tables are a legitimate degenerate state: every case and
/// site lookup simply fails validation.
pub fn generate(
    templates: &TemplateSet,
    sites: &SiteDirectory,
    request: &LetterRequest,
) -> Result<GeneratedLetter, Vec<ValidationFailure>> {
    debug!(
        "generate: case: {:?} site_code: {:?}",
        request.case, request.site_code
    );
    let mut failures: Vec<ValidationFailure> = Vec::new();

    if request.claim_number.trim().is_empty() {
        failures.push(ValidationFailure::MissingClaimNumber);
    }

    // The grammar admits a body of separators only; a RUT with no digits
    // is invalid.
    let parsed_rut = parse_rut(&request.rut).filter(|r| !r.body.is_empty());
    if parsed_rut.is_none() {
        failures.push(ValidationFailure::InvalidRut);
    }

    let template = templates.get(&request.case);
    if template.is_none() {
        failures.push(ValidationFailure::UnknownCase(request.case.clone()));
    }

    let site = sites.get(&request.site_code);
    if site.is_none() {
        failures.push(ValidationFailure::UnknownSite(request.site_code.clone()));
    }

    if request.case == template::EXTRAS_CASE {
        if request.extras.date.as_deref().unwrap_or("").trim().is_empty() {
            failures.push(ValidationFailure::MissingDate);
        }
        if request
            .extras
            .origin
            .as_deref()
            .unwrap_or("")
            .trim()
            .is_empty()
        {
            failures.push(ValidationFailure::MissingOrigin);
        }
    }

    if !failures.is_empty() {
        info!("generate: rejected with {} failure(s)", failures.len());
        return Err(failures);
    }

    // All the preconditions hold at this point.
    let template = template.unwrap();
    let site = site.unwrap();
    let rut = parsed_rut.unwrap();

    let text = render_letter(template, site, &request.case, &request.extras);
    Ok(GeneratedLetter {
        text,
        rut,
        case: request.case.clone(),
        commune: site.commune.clone(),
        claim_number: request.claim_number.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> TemplateSet {
        TemplateSet::new(vec![
            (
                "1".to_string(),
                "Su local es (nombre del local), (comuna respectiva).".to_string(),
            ),
            (
                "5".to_string(),
                "Certificado emitido el (fecha) vía (origen).".to_string(),
            ),
            ("5.1".to_string(), "Caso especial sin extras.".to_string()),
        ])
    }

    fn sites() -> SiteDirectory {
        SiteDirectory::new(vec![
            SiteRecord {
                code: "1001".to_string(),
                name: "Escuela A".to_string(),
                address: "Calle Larga 12".to_string(),
                commune: "Santiago".to_string(),
                region: "Metropolitana".to_string(),
            },
            SiteRecord {
                code: "2002".to_string(),
                name: "Liceo B".to_string(),
                address: "Av. Costanera 8".to_string(),
                commune: "Valparaíso".to_string(),
                region: "Valparaíso".to_string(),
            },
            SiteRecord {
                code: "2003".to_string(),
                name: "Colegio C".to_string(),
                address: "Plaza 1".to_string(),
                commune: "Quilpué".to_string(),
                region: "Valparaíso".to_string(),
            },
        ])
    }

    fn request(case: &str, site_code: &str) -> LetterRequest {
        LetterRequest {
            claim_number: "R-2024-17".to_string(),
            rut: "12.345.678-9".to_string(),
            case: case.to_string(),
            site_code: site_code.to_string(),
            extras: Extras::default(),
        }
    }

    #[test]
    fn generates_a_letter_end_to_end() {
        let letter = generate(&templates(), &sites(), &request("1", "1001")).unwrap();
        assert_eq!(letter.text, "Su local es Escuela A, Santiago.");
        assert_eq!(letter.rut.body, "12345678");
        assert_eq!(letter.rut.check_digit, '9');
        assert_eq!(letter.commune, "Santiago");
    }

    #[test]
    fn collects_every_failure_at_once() {
        let req = LetterRequest {
            claim_number: "  ".to_string(),
            rut: "abc".to_string(),
            case: "99".to_string(),
            site_code: "0".to_string(),
            extras: Extras::default(),
        };
        let failures = generate(&templates(), &sites(), &req).unwrap_err();
        assert_eq!(
            failures,
            vec![
                ValidationFailure::MissingClaimNumber,
                ValidationFailure::InvalidRut,
                ValidationFailure::UnknownCase("99".to_string()),
                ValidationFailure::UnknownSite("0".to_string()),
            ]
        );
    }

    #[test]
    fn rut_without_digits_is_rejected() {
        // ".-9" matches the grammar with an empty body; the pipeline must
        // not emit a letter for it.
        let mut req = request("1", "1001");
        req.rut = ".-9".to_string();
        let failures = generate(&templates(), &sites(), &req).unwrap_err();
        assert_eq!(failures, vec![ValidationFailure::InvalidRut]);
    }

    #[test]
    fn case5_requires_date_and_origin() {
        let mut req = request("5", "1001");
        let failures = generate(&templates(), &sites(), &req).unwrap_err();
        assert_eq!(
            failures,
            vec![
                ValidationFailure::MissingDate,
                ValidationFailure::MissingOrigin
            ]
        );

        req.extras = Extras {
            date: Some("2024-05-01".to_string()),
            origin: Some("Clave Única".to_string()),
        };
        let letter = generate(&templates(), &sites(), &req).unwrap();
        assert_eq!(
            letter.text,
            "Certificado emitido el 2024-05-01 vía Clave Única."
        );
    }

    #[test]
    fn sub_case_of_5_does_not_require_extras() {
        let letter = generate(&templates(), &sites(), &request("5.1", "1001")).unwrap();
        assert_eq!(letter.text, "Caso especial sin extras.");
    }

    #[test]
    fn empty_tables_are_a_degenerate_state_not_an_error() {
        let failures = generate(
            &TemplateSet::default(),
            &SiteDirectory::default(),
            &request("1", "1001"),
        )
        .unwrap_err();
        assert!(failures.contains(&ValidationFailure::UnknownCase("1".to_string())));
        assert!(failures.contains(&ValidationFailure::UnknownSite("1001".to_string())));
    }

    #[test]
    fn log_row_carries_the_substituted_fields() {
        let letter = generate(&templates(), &sites(), &request("1", "1001")).unwrap();
        let row = letter.log_row("2024-05-01 10:00:00");
        assert_eq!(row.claim_number, "R-2024-17");
        assert_eq!(row.timestamp, "2024-05-01 10:00:00");
        assert_eq!(row.case, "1");
        assert_eq!(row.commune, "Santiago");
        assert_eq!(row.rut_body, "12345678");
        assert_eq!(row.check_digit, "9");
        // Round trip: the rendered text still carries the substituted values.
        assert!(row.text.contains("Escuela A"));
        assert!(row.text.contains("Santiago"));
    }

    #[test]
    fn memory_sink_appends_rows_in_order() {
        let mut sink = MemorySink::default();
        let letter = generate(&templates(), &sites(), &request("1", "1001")).unwrap();
        sink.append(&letter.log_row("t1")).unwrap();
        sink.append(&letter.log_row("t2")).unwrap();
        assert_eq!(sink.rows.len(), 2);
        assert_eq!(sink.rows[0].timestamp, "t1");
        assert_eq!(sink.rows[1].timestamp, "t2");
    }

    #[test]
    fn display_case_coerces_only_purely_numeric_labels() {
        assert_eq!(display_case("5"), "5");
        assert_eq!(display_case("05"), "5");
        assert_eq!(display_case("5.1"), "5.1");
        assert_eq!(display_case("A"), "A");
        assert_eq!(display_case(""), "");
    }

    #[test]
    fn directory_enumeration_is_stable_and_sorted() {
        let dir = sites();
        assert_eq!(dir.regions(), vec!["Metropolitana", "Valparaíso"]);
        assert_eq!(dir.communes_in("Valparaíso"), vec!["Quilpué", "Valparaíso"]);
        let found = dir.sites_in("Valparaíso", "Quilpué");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "2003");
        assert!(dir.sites_in("Valparaíso", "Santiago").is_empty());
    }

    #[test]
    fn template_set_enumerates_cases_sorted() {
        assert_eq!(templates().cases(), vec!["1", "5", "5.1"]);
    }
}
