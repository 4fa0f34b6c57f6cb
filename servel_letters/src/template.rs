//! Placeholder substitution for response templates.
//!
//! Templates are plain text with a handful of fixed literal tokens. There
//! is no templating language, no escaping and no recursive substitution: a
//! token is replaced only when it appears verbatim in the source template.

use crate::config::{Extras, SiteRecord};

pub const TOKEN_SITE_NAME: &str = "(nombre del local)";
pub const TOKEN_SITE_ADDRESS: &str = "(direccion del local)";
pub const TOKEN_COMMUNE: &str = "(comuna respectiva)";
pub const TOKEN_REGION: &str = "(region respectiva)";
pub const TOKEN_DATE: &str = "(fecha)";
pub const TOKEN_ORIGIN: &str = "(origen)";

/// The single case whose templates carry the date and origin extras.
pub const EXTRAS_CASE: &str = "5";

/// Renders a template against a located record.
///
/// The four location tokens are substituted first, in fixed order: site
/// name, address, commune, region. An empty attribute substitutes the
/// empty string; the surrounding text is kept.
///
/// The date and origin extras apply only when `case` is exactly `"5"`, and
/// strictly after the location tokens. For each extra independently: if the
/// template contains the token, the token is replaced by the value (empty
/// string when unset); otherwise a non-empty value is appended to the text
/// as `" (value)"` and an empty value does nothing.
///
/// The caller is responsible for checking that the site code resolved to a
/// record before calling; this function never looks anything up.
pub fn render_letter(template: &str, site: &SiteRecord, case: &str, extras: &Extras) -> String {
    let mut text = template.replace(TOKEN_SITE_NAME, &site.name);
    text = text.replace(TOKEN_SITE_ADDRESS, &site.address);
    text = text.replace(TOKEN_COMMUNE, &site.commune);
    text = text.replace(TOKEN_REGION, &site.region);
    if case == EXTRAS_CASE {
        text = apply_extra(text, TOKEN_DATE, extras.date.as_deref());
        text = apply_extra(text, TOKEN_ORIGIN, extras.origin.as_deref());
    }
    text
}

fn apply_extra(text: String, token: &str, value: Option<&str>) -> String {
    let value = value.unwrap_or("");
    if text.contains(token) {
        text.replace(token, value)
    } else if value.is_empty() {
        text
    } else {
        format!("{} ({})", text, value)
    }
}
