use std::collections::HashSet;

use serde::Serialize;

use crate::backend::models::{JobPost, JobType};

/// Headline numbers for the public job board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobBoardStats {
    pub active_jobs: usize,
    pub companies: usize,
    pub job_types: usize,
    pub full_time: usize,
    pub part_time: usize,
    pub contract: usize,
}

impl JobBoardStats {
    /// `posts` is expected to already be filtered to active postings
    pub fn from_posts(posts: &[JobPost]) -> Self {
        let companies: HashSet<&str> = posts.iter().map(|p| p.company_name.as_str()).collect();
        let job_types: HashSet<JobType> = posts.iter().map(|p| p.job_type).collect();
        let count = |job_type: JobType| posts.iter().filter(|p| p.job_type == job_type).count();

        Self {
            active_jobs: posts.len(),
            companies: companies.len(),
            job_types: job_types.len(),
            full_time: count(JobType::FullTime),
            part_time: count(JobType::PartTime),
            contract: count(JobType::Contract),
        }
    }
}
