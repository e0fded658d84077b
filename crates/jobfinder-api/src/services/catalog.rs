//! In-memory job catalog.
//!
//! Stands in for a job-listing data source: a fixed set of sample postings
//! served read-only to the listing and detail pages.

use jobfinder_models::{JobFilter, JobPosting, JobType, SalaryRange};

/// Read-only set of postings, ordered by id.
#[derive(Debug, Clone)]
pub struct JobCatalog {
    postings: Vec<JobPosting>,
}

impl JobCatalog {
    pub fn new(mut postings: Vec<JobPosting>) -> Self {
        postings.sort_by_key(|p| p.id);
        Self { postings }
    }

    /// Catalog seeded with the sample postings shown on the site.
    pub fn sample() -> Self {
        Self::new(sample_postings())
    }

    /// Postings matching every criterion of `filter`.
    pub fn list(&self, filter: &JobFilter) -> Vec<&JobPosting> {
        self.postings.iter().filter(|p| filter.matches(p)).collect()
    }

    pub fn get(&self, id: u32) -> Option<&JobPosting> {
        self.postings.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

impl Default for JobCatalog {
    fn default() -> Self {
        Self::sample()
    }
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn card(
    id: u32,
    title: &str,
    company: &str,
    location: &str,
    job_type: JobType,
    remote: bool,
    salary: SalaryRange,
    description: &str,
    posted_days_ago: u32,
    logo: &str,
) -> JobPosting {
    JobPosting {
        id,
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        job_type,
        remote,
        salary,
        description: description.to_string(),
        responsibilities: Vec::new(),
        requirements: Vec::new(),
        benefits: Vec::new(),
        posted_days_ago,
        logo: Some(logo.to_string()),
    }
}

fn sample_postings() -> Vec<JobPosting> {
    vec![
        JobPosting {
            id: 1,
            title: "Frontend Developer".to_string(),
            company: "TechCorp".to_string(),
            location: "Bangalore, India".to_string(),
            job_type: JobType::FullTime,
            remote: true,
            salary: SalaryRange::new(800_000, 1_500_000),
            description: "We are looking for a skilled Frontend Developer to join our team. The ideal candidate should have experience with React, TypeScript, and modern web development practices.".to_string(),
            responsibilities: lines(&[
                "Develop and maintain responsive web applications",
                "Collaborate with back-end developers and designers",
                "Write clean, efficient, and maintainable code",
                "Troubleshoot and debug applications",
                "Optimize applications for maximum speed and scalability",
            ]),
            requirements: lines(&[
                "3+ years of experience with React.js",
                "Strong proficiency in JavaScript, including DOM manipulation and the JavaScript object model",
                "Experience with TypeScript",
                "Familiarity with RESTful APIs",
                "Understanding of server-side rendering",
                "Knowledge of modern front-end build pipelines and tools",
            ]),
            benefits: lines(&[
                "Flexible working hours",
                "Remote work options",
                "Health insurance",
                "Annual bonus",
                "Professional development budget",
            ]),
            posted_days_ago: 2,
            logo: None,
        },
        JobPosting {
            id: 2,
            title: "Backend Engineer".to_string(),
            company: "InnovateX".to_string(),
            location: "Mumbai, India".to_string(),
            job_type: JobType::FullTime,
            remote: true,
            salary: SalaryRange::new(1_000_000, 1_800_000),
            description: "Join our backend team working on scalable cloud solutions. You'll be building APIs and microservices that power our customer-facing applications.".to_string(),
            responsibilities: lines(&[
                "Design and implement scalable backend services",
                "Create and maintain API documentation",
                "Work with database design and optimization",
                "Collaborate with frontend engineers",
                "Participate in code reviews",
            ]),
            requirements: lines(&[
                "4+ years of experience with Node.js or Python",
                "Experience with microservices architecture",
                "Knowledge of SQL and NoSQL databases",
                "Familiarity with AWS or other cloud platforms",
                "Understanding of CI/CD pipelines",
            ]),
            benefits: lines(&[
                "Competitive salary",
                "Remote work",
                "Healthcare benefits",
                "Equity options",
                "Unlimited paid time off",
            ]),
            posted_days_ago: 7,
            logo: None,
        },
        card(
            3,
            "Senior Frontend Developer",
            "TechCorp Solutions",
            "Bangalore, India",
            JobType::FullTime,
            true,
            SalaryRange::new(1_200_000, 2_000_000),
            "We are looking for an experienced Frontend Developer proficient in React.js, Next.js, and TypeScript to join our growing team.",
            2,
            "/logos/techcorp.png",
        ),
        card(
            4,
            "Backend Engineer",
            "InnovateTech",
            "Mumbai, India",
            JobType::FullTime,
            false,
            SalaryRange::new(900_000, 1_600_000),
            "Join our backend team to build scalable APIs and microservices using Node.js, Express, and MongoDB.",
            7,
            "/logos/innovatetech.png",
        ),
        card(
            5,
            "UX/UI Designer",
            "DesignHub",
            "Delhi, India",
            JobType::FullTime,
            true,
            SalaryRange::new(600_000, 1_000_000),
            "Looking for a creative UX/UI Designer to create beautiful and functional interfaces for our products.",
            3,
            "/logos/designhub.png",
        ),
        card(
            6,
            "DevOps Engineer",
            "CloudNative",
            "Hyderabad, India",
            JobType::Contract,
            true,
            SalaryRange::new(1_000_000, 1_800_000),
            "Experienced DevOps Engineer needed to manage our cloud infrastructure, CI/CD pipelines, and Kubernetes clusters.",
            5,
            "/logos/cloudnative.png",
        ),
        card(
            7,
            "Mobile App Developer",
            "AppGenius",
            "Pune, India",
            JobType::FullTime,
            false,
            SalaryRange::new(500_000, 900_000),
            "Develop cross-platform mobile applications using React Native and Firebase for our clients in the healthcare industry.",
            1,
            "/logos/appgenius.png",
        ),
        card(
            8,
            "Data Scientist",
            "DataMinds",
            "Bangalore, India",
            JobType::FullTime,
            true,
            SalaryRange::new(1_400_000, 2_400_000),
            "Join our data science team to develop machine learning models and analyze large datasets to drive business decisions.",
            14,
            "/logos/dataminds.png",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobfinder_models::SalaryBracket;

    fn ids(postings: &[&JobPosting]) -> Vec<u32> {
        postings.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_sample_catalog_is_ordered() {
        let catalog = JobCatalog::sample();
        assert_eq!(catalog.len(), 8);
        assert_eq!(ids(&catalog.list(&JobFilter::default())), (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn test_get_by_id() {
        let catalog = JobCatalog::sample();
        let job = catalog.get(2).unwrap();
        assert_eq!(job.company, "InnovateX");
        assert_eq!(job.salary.label(), "₹10,00,000 - ₹18,00,000 per year");
        assert_eq!(job.posted_label(), "1 week ago");
        assert!(catalog.get(99).is_none());
    }

    #[test]
    fn test_query_and_location() {
        let catalog = JobCatalog::sample();
        let filter = JobFilter {
            query: Some("backend".into()),
            ..Default::default()
        };
        assert_eq!(ids(&catalog.list(&filter)), vec![2, 4]);

        let filter = JobFilter {
            location: Some("bangalore".into()),
            ..Default::default()
        };
        assert_eq!(ids(&catalog.list(&filter)), vec![1, 3, 8]);
    }

    #[test]
    fn test_type_remote_and_salary() {
        let catalog = JobCatalog::sample();
        let filter = JobFilter {
            job_types: vec![JobType::Contract],
            ..Default::default()
        };
        assert_eq!(ids(&catalog.list(&filter)), vec![6]);

        let filter = JobFilter {
            remote_only: true,
            salary: Some(SalaryBracket::From6To10L),
            ..Default::default()
        };
        assert_eq!(ids(&catalog.list(&filter)), vec![1, 5]);

        let filter = JobFilter {
            job_types: vec![JobType::Internship],
            ..Default::default()
        };
        assert!(catalog.list(&filter).is_empty());
    }
}
