//! Endpoint URL builders
//!
//! Base URLs come from [`crate::config::ServiceConfig::base_url`] and never
//! carry a trailing slash.

/// HMMER phmmer submission
pub fn phmmer_search_url(base_url: &str) -> String {
    format!("{}/search/phmmer", base_url)
}

/// HMMER job status and result (same resource)
pub fn hmmer_result_url(base_url: &str, job_id: &str) -> String {
    format!("{}/result/{}", base_url, job_id)
}

/// UniProt ID mapping submission
pub fn idmapping_run_url(base_url: &str) -> String {
    format!("{}/idmapping/run", base_url)
}

/// UniProt ID mapping job status
pub fn idmapping_status_url(base_url: &str, job_id: &str) -> String {
    format!("{}/idmapping/status/{}", base_url, job_id)
}

/// UniProt ID mapping results
pub fn idmapping_results_url(base_url: &str, job_id: &str) -> String {
    format!("{}/idmapping/results/{}", base_url, job_id)
}
