pub mod extract;
pub mod fetch;
pub mod tree;

pub use extract::{extract_problem_ids, extract_problem_name, extract_sample_tests};
pub use fetch::{contest_url, problem_url, HttpFetcher, PageFetcher};
pub use tree::PageTree;
