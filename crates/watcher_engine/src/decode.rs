use serde::Deserialize;
use watcher_core::Job;

use crate::{FailureKind, FetchError};

#[derive(Debug, Deserialize)]
struct JobsPayload {
    #[serde(default)]
    jobs: Vec<Job>,
}

/// Decode the body of `/api/json?tree=jobs[name,color,url]`.
///
/// Unknown fields such as `_class` are ignored; a `watched` flag is never
/// taken from the server.
pub fn decode_jobs(bytes: &[u8]) -> Result<Vec<Job>, FetchError> {
    let payload: JobsPayload = serde_json::from_slice(bytes)
        .map_err(|err| FetchError::new(FailureKind::InvalidPayload, err.to_string()))?;
    Ok(payload
        .jobs
        .into_iter()
        .map(|job| Job {
            watched: false,
            ..job
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_jenkins_job_list() {
        let body = br#"{
            "_class": "hudson.model.Hudson",
            "jobs": [
                {"_class": "hudson.model.FreeStyleProject", "name": "api", "url": "https://ci/job/api/", "color": "blue_anime"},
                {"_class": "com.cloudbees.hudson.plugins.folder.Folder", "name": "team", "url": "https://ci/job/team/"},
                {"name": "web", "url": "https://ci/job/web/", "color": null, "watched": true}
            ]
        }"#;

        let jobs = decode_jobs(body).unwrap();
        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].color.as_deref(), Some("blue_anime"));
        assert_eq!(jobs[1].color, None);
        assert!(!jobs[2].watched);
    }

    #[test]
    fn missing_jobs_array_is_empty() {
        assert!(decode_jobs(b"{}").unwrap().is_empty());
    }

    #[test]
    fn html_login_page_is_invalid_payload() {
        let err = decode_jobs(b"<html>login</html>").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidPayload);
    }
}
