//! Job catalog handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use jobfinder_models::{JobFilter, JobPosting, JobType, SalaryBracket};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Query string of `GET /api/jobs`.
#[derive(Debug, Default, Deserialize)]
pub struct JobsQuery {
    pub q: Option<String>,
    pub location: Option<String>,
    /// Comma-separated job types
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    #[serde(default)]
    pub remote: Option<bool>,
    pub salary: Option<String>,
}

impl JobsQuery {
    pub fn into_filter(self) -> ApiResult<JobFilter> {
        let job_types = match self.job_type.as_deref() {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<JobType>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ApiError::bad_request(e.to_string()))?,
            None => Vec::new(),
        };

        let salary = match self.salary.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(
                s.parse::<SalaryBracket>()
                    .map_err(|e| ApiError::bad_request(e.to_string()))?,
            ),
            _ => None,
        };

        Ok(JobFilter {
            query: self.q,
            location: self.location,
            job_types,
            remote_only: self.remote.unwrap_or(false),
            salary,
        })
    }
}

/// A posting plus the labels the pages display.
#[derive(Debug, Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub posting: JobPosting,
    pub salary_label: String,
    pub posted_label: String,
}

impl From<&JobPosting> for JobView {
    fn from(posting: &JobPosting) -> Self {
        Self {
            salary_label: posting.salary.label(),
            posted_label: posting.posted_label(),
            posting: posting.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobView>,
    pub total: usize,
}

pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> ApiResult<Json<JobListResponse>> {
    let filter = query.into_filter()?;
    let jobs: Vec<JobView> = state.catalog.list(&filter).into_iter().map(JobView::from).collect();
    metrics::record_job_search(jobs.len());

    Ok(Json(JobListResponse {
        total: jobs.len(),
        jobs,
    }))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<JobView>> {
    let posting = state
        .catalog
        .get(id)
        .ok_or_else(|| ApiError::not_found(format!("Job {} not found", id)))?;

    Ok(Json(JobView::from(posting)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parses_type_list() {
        let query = JobsQuery {
            job_type: Some("full-time, Contract".into()),
            salary: Some("10-15L".into()),
            remote: Some(true),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.job_types, vec![JobType::FullTime, JobType::Contract]);
        assert_eq!(filter.salary, Some(SalaryBracket::From10To15L));
        assert!(filter.remote_only);
    }

    #[test]
    fn test_query_rejects_unknown_values() {
        let query = JobsQuery {
            job_type: Some("gig".into()),
            ..Default::default()
        };
        assert!(matches!(query.into_filter(), Err(ApiError::BadRequest(_))));

        let query = JobsQuery {
            salary: Some("100L".into()),
            ..Default::default()
        };
        assert!(matches!(query.into_filter(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_empty_salary_is_ignored() {
        let query = JobsQuery {
            salary: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(query.into_filter().unwrap().salary, None);
    }
}
