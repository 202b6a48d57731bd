//! Requirement matching: role keyword coverage and job-description fit.

pub mod fit;
pub mod jd_parser;
pub mod roles;

pub use fit::{match_job_description, ImprovementPriority, JobMatchReport};
pub use jd_parser::parse_job_description;
pub use roles::role_keyword_gap;
