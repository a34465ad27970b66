//! Data Transfer Objects for the document service API
//!
//! Small response bodies returned by submission and upload endpoints.

pub mod document;
pub mod task;
