use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Employment type of a job posting
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
}

impl JobType {
    pub fn as_str(self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
        }
    }

    /// Each hyphen-separated word capitalised, e.g. `Full-Time`
    pub fn label(self) -> &'static str {
        match self {
            JobType::FullTime => "Full-Time",
            JobType::PartTime => "Part-Time",
            JobType::Contract => "Contract",
        }
    }
}

/// A `job_posts` row as returned by the table API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobPost {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub company_name: String,
    pub description: String,
    pub location: String,
    pub job_type: JobType,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub requirements: Option<Vec<String>>,
    #[serde(default)]
    pub benefits: Option<Vec<String>>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn active_by_default() -> bool {
    true
}

/// User supplied fields of a job posting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct JobPostInput {
    #[validate(custom(
        function = "crate::api::validation::not_blank",
        message = "Job title is required"
    ))]
    pub title: String,
    #[validate(custom(
        function = "crate::api::validation::not_blank",
        message = "Company name is required"
    ))]
    pub company_name: String,
    #[validate(custom(
        function = "crate::api::validation::not_blank",
        message = "Job description is required"
    ))]
    pub description: String,
    #[validate(custom(
        function = "crate::api::validation::not_blank",
        message = "Location is required"
    ))]
    pub location: String,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

/// Insert payload; the owner always comes from the authenticated session
#[derive(Debug, Serialize)]
pub struct NewJobPost<'a> {
    pub user_id: &'a str,
    #[serde(flatten)]
    pub post: &'a JobPostInput,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
pub struct JobPostChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(
        function = "crate::api::validation::not_blank",
        message = "Job title is required"
    ))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(
        function = "crate::api::validation::not_blank",
        message = "Company name is required"
    ))]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(
        function = "crate::api::validation::not_blank",
        message = "Job description is required"
    ))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(
        function = "crate::api::validation::not_blank",
        message = "Location is required"
    ))]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    /// `Some(None)` clears the salary range
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary_range: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Keeps an explicit `null` apart from a missing key
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl JobPostChanges {
    pub fn is_empty(&self) -> bool {
        *self == JobPostChanges::default()
    }
}

/// A `profiles` row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Identity returned by the auth API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AuthUser {
    /// Local part of the e-mail address, used as a greeting
    pub fn display_name(&self) -> &str {
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|name| !name.is_empty())
            .unwrap_or("User")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}
