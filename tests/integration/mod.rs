//! Library-level flows against the mock engine.

pub mod catalog_test;
pub mod dashboard_test;
pub mod presentation_test;
pub mod selection_file_test;
