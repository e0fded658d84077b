//! Job postings and catalog filters.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const LAKH: u64 = 100_000;

/// Employment type shown on job cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Internship,
    Freelance,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
            JobType::Freelance => "Freelance",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobType {
    type Err = JobTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "fulltime" => Ok(JobType::FullTime),
            "parttime" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "internship" => Ok(JobType::Internship),
            "freelance" => Ok(JobType::Freelance),
            _ => Err(JobTypeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown job type: {0}")]
pub struct JobTypeParseError(String);

/// Annual salary range in rupees. `max = None` means open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SalaryRange {
    pub min: u64,
    pub max: Option<u64>,
}

impl SalaryRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max: Some(max) }
    }

    /// Human-readable label, e.g. `₹8,00,000 - ₹15,00,000 per year`.
    pub fn label(&self) -> String {
        match self.max {
            Some(max) => format!("₹{} - ₹{} per year", format_inr(self.min), format_inr(max)),
            None => format!("₹{}+ per year", format_inr(self.min)),
        }
    }
}

/// Salary buckets offered by the listing filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SalaryBracket {
    #[serde(rename = "0-3L")]
    UpTo3L,
    #[serde(rename = "3-6L")]
    From3To6L,
    #[serde(rename = "6-10L")]
    From6To10L,
    #[serde(rename = "10-15L")]
    From10To15L,
    #[serde(rename = "15L+")]
    Above15L,
}

impl SalaryBracket {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalaryBracket::UpTo3L => "0-3L",
            SalaryBracket::From3To6L => "3-6L",
            SalaryBracket::From6To10L => "6-10L",
            SalaryBracket::From10To15L => "10-15L",
            SalaryBracket::Above15L => "15L+",
        }
    }

    /// Half-open bounds `[lo, hi)` in rupees.
    fn bounds(&self) -> (u64, Option<u64>) {
        match self {
            SalaryBracket::UpTo3L => (0, Some(3 * LAKH)),
            SalaryBracket::From3To6L => (3 * LAKH, Some(6 * LAKH)),
            SalaryBracket::From6To10L => (6 * LAKH, Some(10 * LAKH)),
            SalaryBracket::From10To15L => (10 * LAKH, Some(15 * LAKH)),
            SalaryBracket::Above15L => (15 * LAKH, None),
        }
    }

    /// True when any part of `range` falls inside this bracket.
    pub fn overlaps(&self, range: &SalaryRange) -> bool {
        let (lo, hi) = self.bounds();
        let starts_before_end = hi.map_or(true, |hi| range.min < hi);
        let ends_after_start = range.max.map_or(true, |max| max >= lo);
        starts_before_end && ends_after_start
    }
}

impl FromStr for SalaryBracket {
    type Err = SalaryBracketParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "0-3L" => Ok(SalaryBracket::UpTo3L),
            "3-6L" => Ok(SalaryBracket::From3To6L),
            "6-10L" => Ok(SalaryBracket::From6To10L),
            "10-15L" => Ok(SalaryBracket::From10To15L),
            "15L+" | "15L" => Ok(SalaryBracket::Above15L),
            _ => Err(SalaryBracketParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown salary bracket: {0}")]
pub struct SalaryBracketParseError(String);

/// A job posting as shown on the listing and detail pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobPosting {
    pub id: u32,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: JobType,
    pub remote: bool,
    pub salary: SalaryRange,
    pub description: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub posted_days_ago: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl JobPosting {
    /// Relative age label ("2 days ago", "1 week ago").
    pub fn posted_label(&self) -> String {
        posted_label(self.posted_days_ago)
    }
}

fn posted_label(days: u32) -> String {
    fn plural(n: u32, unit: &str) -> String {
        if n == 1 {
            format!("1 {} ago", unit)
        } else {
            format!("{} {}s ago", n, unit)
        }
    }

    match days {
        0 => "Today".to_string(),
        1..=6 => plural(days, "day"),
        7..=29 => plural(days / 7, "week"),
        _ => plural(days / 30, "month"),
    }
}

/// Listing filters. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobFilter {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_types: Vec<JobType>,
    #[serde(default)]
    pub remote_only: bool,
    #[serde(default)]
    pub salary: Option<SalaryBracket>,
}

impl JobFilter {
    pub fn matches(&self, job: &JobPosting) -> bool {
        if let Some(query) = non_empty(&self.query) {
            let query = query.to_lowercase();
            let hit = job.title.to_lowercase().contains(&query)
                || job.company.to_lowercase().contains(&query)
                || job.description.to_lowercase().contains(&query);
            if !hit {
                return false;
            }
        }

        if let Some(location) = non_empty(&self.location) {
            if !job.location.to_lowercase().contains(&location.to_lowercase()) {
                return false;
            }
        }

        if !self.job_types.is_empty() && !self.job_types.contains(&job.job_type) {
            return false;
        }

        if self.remote_only && !job.remote {
            return false;
        }

        match self.salary {
            Some(bracket) => bracket.overlaps(&job.salary),
            None => true,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Format a rupee amount with Indian digit grouping (`15,00,000`).
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(job_type: JobType, remote: bool, salary: SalaryRange) -> JobPosting {
        JobPosting {
            id: 1,
            title: "Backend Engineer".to_string(),
            company: "InnovateX".to_string(),
            location: "Mumbai, India".to_string(),
            job_type,
            remote,
            salary,
            description: "Build scalable APIs".to_string(),
            responsibilities: vec![],
            requirements: vec![],
            benefits: vec![],
            posted_days_ago: 7,
            logo: None,
        }
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(0), "0");
        assert_eq!(format_inr(999), "999");
        assert_eq!(format_inr(300_000), "3,00,000");
        assert_eq!(format_inr(1_500_000), "15,00,000");
        assert_eq!(format_inr(12_345_678), "1,23,45,678");
    }

    #[test]
    fn test_salary_label() {
        assert_eq!(
            SalaryRange::new(800_000, 1_500_000).label(),
            "₹8,00,000 - ₹15,00,000 per year"
        );
        let open = SalaryRange { min: 1_500_000, max: None };
        assert_eq!(open.label(), "₹15,00,000+ per year");
    }

    #[test]
    fn test_bracket_overlap_is_half_open() {
        let range = SalaryRange::new(300_000, 600_000);
        assert!(!SalaryBracket::UpTo3L.overlaps(&range));
        assert!(SalaryBracket::From3To6L.overlaps(&range));
        assert!(SalaryBracket::From6To10L.overlaps(&range));
        assert!(!SalaryBracket::From10To15L.overlaps(&range));

        let open = SalaryRange { min: 2_000_000, max: None };
        assert!(SalaryBracket::Above15L.overlaps(&open));
        assert!(!SalaryBracket::UpTo3L.overlaps(&open));
    }

    #[test]
    fn test_job_type_parse() {
        assert_eq!("full-time".parse::<JobType>().unwrap(), JobType::FullTime);
        assert_eq!("Part time".parse::<JobType>().unwrap(), JobType::PartTime);
        assert!("gig".parse::<JobType>().is_err());
        assert_eq!(serde_json::to_string(&JobType::FullTime).unwrap(), "\"Full-time\"");
    }

    #[test]
    fn test_posted_label() {
        assert_eq!(posted_label(0), "Today");
        assert_eq!(posted_label(1), "1 day ago");
        assert_eq!(posted_label(2), "2 days ago");
        assert_eq!(posted_label(7), "1 week ago");
        assert_eq!(posted_label(14), "2 weeks ago");
        assert_eq!(posted_label(45), "1 month ago");
    }

    #[test]
    fn test_filter_combines_criteria() {
        let job = posting(JobType::FullTime, true, SalaryRange::new(1_000_000, 1_800_000));

        assert!(JobFilter::default().matches(&job));

        let filter = JobFilter {
            query: Some("apis".into()),
            location: Some("mumbai".into()),
            job_types: vec![JobType::FullTime, JobType::Contract],
            remote_only: true,
            salary: Some(SalaryBracket::From10To15L),
        };
        assert!(filter.matches(&job));

        let filter = JobFilter {
            job_types: vec![JobType::Internship],
            ..Default::default()
        };
        assert!(!filter.matches(&job));

        let onsite = posting(JobType::FullTime, false, SalaryRange::new(1_000_000, 1_800_000));
        let filter = JobFilter {
            remote_only: true,
            ..Default::default()
        };
        assert!(!filter.matches(&onsite));
    }

    #[test]
    fn test_blank_query_matches_everything() {
        let job = posting(JobType::Contract, false, SalaryRange::new(500_000, 700_000));
        let filter = JobFilter {
            query: Some("   ".into()),
            ..Default::default()
        };
        assert!(filter.matches(&job));
    }
}
