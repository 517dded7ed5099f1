//! WASM bindings for job search.

use wasm_bindgen::prelude::*;

/// Trim and lower-case text.
#[wasm_bindgen(js_name = normalizeText)]
pub fn normalize_text(text: &str) -> String {
    crate::normalize_text(Some(text))
}

/// Canonical metro bucket for a location string.
#[wasm_bindgen(js_name = normalizeLocation)]
pub fn normalize_location(text: &str) -> String {
    crate::normalize_location(Some(text))
}

/// Search jobs and return ranked results as JSON.
///
/// # Arguments
/// * `query` - Search query
/// * `jobs_json` - JSON array of jobs with `position`, `company` and `location` fields
/// * `max_results` - Maximum results to return (0 for all)
///
/// # Returns
/// JSON array of `{ item, score, matches }`, best first. Each `item` is the
/// input job with `positionN`, `companyN` and `locationN` added. Malformed
/// input yields `"[]"`.
#[wasm_bindgen(js_name = searchJobs)]
pub fn search_jobs(query: &str, jobs_json: &str, max_results: usize) -> String {
    match crate::search_jobs_json(query, jobs_json, max_results) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(code = e.code() as u32, error = %e, "Search request discarded");
            "[]".to_string()
        }
    }
}
