pub mod keywords;
pub mod research;

pub use keywords::analyze_keywords;
pub use research::get_job_status;
