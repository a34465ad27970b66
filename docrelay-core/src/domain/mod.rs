//! Core domain types
//!
//! This module contains the structures describing remote work as seen by
//! a polling client. They mirror the document service's JSON shapes.

pub mod task;
