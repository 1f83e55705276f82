use chrono::{DateTime, Utc};

use crate::backend::models::JobPost;

/// List attributes show this many entries before collapsing into "+N more"
const PREVIEW_ITEMS: usize = 3;

/// Display-ready view of a job post
#[derive(Debug, Clone, PartialEq)]
pub struct JobPostCard {
    pub id: String,
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: &'static str,
    pub salary_range: Option<String>,
    pub description: String,
    pub requirements: Vec<String>,
    pub more_requirements: usize,
    pub benefits: Vec<String>,
    pub more_benefits: usize,
    pub posted_on: Option<String>,
    pub is_active: bool,
    /// Edit/Delete buttons, only on the owner's dashboard
    pub show_actions: bool,
}

fn preview(items: Option<&[String]>) -> (Vec<String>, usize) {
    let items = items.unwrap_or_default();
    let shown = items.iter().take(PREVIEW_ITEMS).cloned().collect();
    (shown, items.len().saturating_sub(PREVIEW_ITEMS))
}

/// `Mar 5, 2024`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

impl JobPostCard {
    pub fn new(post: &JobPost, show_actions: bool) -> Self {
        let (requirements, more_requirements) = preview(post.requirements.as_deref());
        let (benefits, more_benefits) = preview(post.benefits.as_deref());

        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            company_name: post.company_name.clone(),
            location: post.location.clone(),
            job_type: post.job_type.label(),
            salary_range: post.salary_range.clone().filter(|s| !s.is_empty()),
            description: post.description.clone(),
            requirements,
            more_requirements,
            benefits,
            more_benefits,
            posted_on: post.created_at.as_ref().map(format_date),
            is_active: post.is_active,
            show_actions,
        }
    }

    pub fn cards(posts: &[JobPost], show_actions: bool) -> Vec<Self> {
        posts.iter().map(|post| Self::new(post, show_actions)).collect()
    }
}
