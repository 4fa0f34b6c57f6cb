// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// A polling location, as produced by the loading layer.
///
/// Every field is plain text and may be empty. The loader owns field-name
/// normalization; the core only ever sees this fixed shape.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SiteRecord {
    /// Unique key of the location.
    pub code: String,
    pub name: String,
    pub address: String,
    pub commune: String,
    pub region: String,
}

/// All the known polling locations, keyed by site code.
///
/// Enumeration is stable: regions, communes and matching sites are always
/// returned sorted (region, then commune, then code).
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SiteDirectory {
    records: HashMap<String, SiteRecord>,
}

impl SiteDirectory {
    pub fn new(records: Vec<SiteRecord>) -> SiteDirectory {
        let mut m: HashMap<String, SiteRecord> = HashMap::new();
        for r in records {
            if !r.code.is_empty() {
                m.insert(r.code.clone(), r);
            }
        }
        SiteDirectory { records: m }
    }

    pub fn get(&self, code: &str) -> Option<&SiteRecord> {
        self.records.get(code)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The distinct non-empty regions, sorted.
    pub fn regions(&self) -> Vec<String> {
        let mut res: Vec<String> = self
            .records
            .values()
            .filter_map(|r| {
                if r.region.is_empty() {
                    None
                } else {
                    Some(r.region.clone())
                }
            })
            .collect();
        res.sort();
        res.dedup();
        res
    }

    /// The distinct communes of a region, sorted.
    pub fn communes_in(&self, region: &str) -> Vec<String> {
        let mut res: Vec<String> = self
            .records
            .values()
            .filter_map(|r| {
                if r.region == region && !r.commune.is_empty() {
                    Some(r.commune.clone())
                } else {
                    None
                }
            })
            .collect();
        res.sort();
        res.dedup();
        res
    }

    /// The locations matching a region and commune, in stable order.
    pub fn sites_in(&self, region: &str, commune: &str) -> Vec<&SiteRecord> {
        let mut res: Vec<&SiteRecord> = self
            .records
            .values()
            .filter(|r| r.region == region && r.commune == commune)
            .collect();
        res.sort_by(|a, b| (&a.region, &a.commune, &a.code).cmp(&(&b.region, &b.commune, &b.code)));
        res
    }
}

/// The response templates, keyed by case identifier.
///
/// Case keys are exact strings (`"5"` and `"5.1"` are distinct keys; no
/// numeric coercion happens here).
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct TemplateSet {
    templates: HashMap<String, String>,
}

impl TemplateSet {
    pub fn new(entries: Vec<(String, String)>) -> TemplateSet {
        let mut m: HashMap<String, String> = HashMap::new();
        for (case, template) in entries {
            if !case.is_empty() && !template.is_empty() {
                m.insert(case, template);
            }
        }
        TemplateSet { templates: m }
    }

    pub fn get(&self, case: &str) -> Option<&str> {
        self.templates.get(case).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// The known case identifiers, sorted lexicographically.
    pub fn cases(&self) -> Vec<String> {
        let mut res: Vec<String> = self.templates.keys().cloned().collect();
        res.sort();
        res
    }
}

/// The per-case extra fields. Only meaningful for case `"5"`.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Extras {
    pub date: Option<String>,
    pub origin: Option<String>,
}

/// One generation request, as collected by the hosting UI.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LetterRequest {
    pub claim_number: String,
    /// The raw RUT string, before parsing.
    pub rut: String,
    pub case: String,
    pub site_code: String,
    pub extras: Extras,
}

// ******** Output data structures *********

/// One row of the generation registry.
///
/// The timestamp is supplied by the caller so that the core stays pure. The
/// field order and the delimiter are owned by the sink implementation.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LogRow {
    pub claim_number: String,
    pub timestamp: String,
    /// Display form of the case (integer coercion applied when purely numeric).
    pub case: String,
    pub commune: String,
    pub rut_body: String,
    pub check_digit: String,
    pub text: String,
}

/// An append-only sink for generation rows, owned by the caller.
///
/// The core never touches file handles; implementations decide where rows
/// go (a file, a session buffer, a test vector).
pub trait LogSink {
    fn append(&mut self, row: &LogRow) -> std::io::Result<()>;
}

/// A sink that keeps rows in memory. Used by the tests and by callers that
/// only want a session-scoped registry.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct MemorySink {
    pub rows: Vec<LogRow>,
}

impl LogSink for MemorySink {
    fn append(&mut self, row: &LogRow) -> std::io::Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }
}

/// The reasons a request may be rejected before rendering.
///
/// All of these are recoverable, locally detected validation failures. They
/// are collected and reported together; the core never panics on bad input.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ValidationFailure {
    MissingClaimNumber,
    InvalidRut,
    UnknownCase(String),
    UnknownSite(String),
    /// Case "5" requires a date extra.
    MissingDate,
    /// Case "5" requires an origin extra.
    MissingOrigin,
}

impl Error for ValidationFailure {}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationFailure::MissingClaimNumber => write!(f, "the claim number is missing"),
            ValidationFailure::InvalidRut => write!(f, "the RUT is not valid"),
            ValidationFailure::UnknownCase(c) => write!(f, "no template found for case {:?}", c),
            ValidationFailure::UnknownSite(c) => {
                write!(f, "no location found for site code {:?}", c)
            }
            ValidationFailure::MissingDate => write!(f, "case 5 requires a date"),
            ValidationFailure::MissingOrigin => write!(f, "case 5 requires an origin"),
        }
    }
}
