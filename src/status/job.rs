use url::Url;

use crate::status::error::StatusError;

/// Query parameter marker carrying the job id
const ID_MARKER: &str = "id=";

/// Query string of a page URL, or of a bare `?...` query
fn page_query(page: &str) -> String {
    match Url::parse(page) {
        Ok(url) => url.query().unwrap_or_default().to_string(),
        Err(_) => {
            let query = page.split_once('?').map_or(page, |(_, rest)| rest);
            query.split('#').next().unwrap_or_default().to_string()
        }
    }
}

/// Extract the job id from a page URL or bare query string.
///
/// Only the query string is searched. Takes whatever follows the first `id=`
/// up to the next `&`. The value is otherwise opaque and not validated.
pub fn extract_job_id(page: &str) -> Result<String, StatusError> {
    let query = page_query(page);

    let after = query
        .split_once(ID_MARKER)
        .map(|(_, rest)| rest)
        .ok_or_else(|| StatusError::MissingJobId(page.to_string()))?;

    let job_id = after.split('&').next().unwrap_or_default();

    if job_id.is_empty() {
        return Err(StatusError::MissingJobId(page.to_string()));
    }

    Ok(job_id.to_string())
}

/// Relative request target for a job: `base_path` followed by the job id
pub fn status_target(base_path: &str, job_id: &str) -> String {
    format!("{}{}", base_path, job_id)
}

/// Resolve the status resource of `job_id` against the page it was read from
pub fn resolve_status_url(page_url: &str, base_path: &str, job_id: &str) -> Result<Url, StatusError> {
    let page = Url::parse(page_url).map_err(|source| StatusError::InvalidUrl {
        url: page_url.to_string(),
        source,
    })?;

    let target = status_target(base_path, job_id);
    page.join(&target).map_err(|source| StatusError::InvalidUrl { url: target, source })
}
