pub mod card;
pub mod dto;
pub mod handlers;
pub mod models;
pub mod service;
pub mod stats;

// Re-export commonly used types
pub use card::JobPostCard;
pub use models::JobPostForm;
pub use service::{JobPostService, ServiceError};
pub use stats::JobBoardStats;
