//! Search form encoding.

use appraisers_core::{FilterField, Page, SearchFilters};

/// Result ordering requested from the roster.
pub const SORT_ORDER: &str = "ad.last_name,ad.first_name";

/// Build the form fields for one page of a query.
///
/// Every filter field is always sent, empty or not, alongside the fixed
/// roster flags (active FHA appraisers with AQB-compliant licenses).
pub fn build_form(filters: &SearchFilters, page: Page) -> Vec<(&'static str, String)> {
    let mut form = vec![("SORTED", SORT_ORDER.to_string())];
    form.extend(FilterField::ALL.map(|f| (f.form_name(), filters.get(f).to_string())));
    form.extend([
        ("STATUSCODE", "0".to_string()),
        ("AQB_INDIC", "Y".to_string()),
        ("IN_FHA", "Yes".to_string()),
        ("startAt", page.start_at.to_string()),
        ("maxRows", page.max_rows.to_string()),
    ]);
    form
}
