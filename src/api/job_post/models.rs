use serde::Deserialize;

use crate::backend::models::{JobPost, JobPostChanges, JobPostInput, JobType};

/// Raw fields of the create/edit HTML form.
///
/// List attributes arrive as newline-delimited text; missing inputs
/// deserialize to empty strings so required-field checks report them.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct JobPostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub benefits: String,
    /// Checkbox, only rendered on the edit form
    #[serde(default)]
    pub is_active: Option<String>,
}

/// Split newline-delimited text into its non-blank lines, in order
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

impl JobPostForm {
    /// Prefill from a stored post (edit form)
    pub fn from_post(post: &JobPost) -> Self {
        Self {
            title: post.title.clone(),
            company_name: post.company_name.clone(),
            description: post.description.clone(),
            location: post.location.clone(),
            job_type: post.job_type,
            salary_range: post.salary_range.clone().unwrap_or_default(),
            requirements: post.requirements.as_deref().unwrap_or_default().join("\n"),
            benefits: post.benefits.as_deref().unwrap_or_default().join("\n"),
            is_active: post.is_active.then(|| "true".to_string()),
        }
    }

    pub fn to_input(&self) -> JobPostInput {
        JobPostInput {
            title: self.title.clone(),
            company_name: self.company_name.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            job_type: self.job_type,
            salary_range: (!self.salary_range.is_empty()).then(|| self.salary_range.clone()),
            requirements: split_lines(&self.requirements),
            benefits: split_lines(&self.benefits),
        }
    }

    /// Full replacement of the editable fields, including the active flag
    pub fn to_changes(&self) -> JobPostChanges {
        let input = self.to_input();
        JobPostChanges {
            title: Some(input.title),
            company_name: Some(input.company_name),
            description: Some(input.description),
            location: Some(input.location),
            job_type: Some(input.job_type),
            salary_range: Some(input.salary_range),
            requirements: Some(input.requirements),
            benefits: Some(input.benefits),
            is_active: Some(self.active()),
        }
    }

    pub fn active(&self) -> bool {
        matches!(self.is_active.as_deref(), Some("true" | "on"))
    }

    /// Used by the template to mark the selected option
    pub fn job_type_is(&self, value: &str) -> bool {
        self.job_type.as_str() == value
    }
}
