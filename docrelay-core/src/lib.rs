//! Docrelay Core
//!
//! Core types shared by the docrelay client and its collaborators.
//!
//! This crate contains:
//! - Domain types: remote task state and failure detail
//! - DTOs: request/response bodies exchanged with the document service
//! - Operation catalogue: endpoint paths of the remote document operations
//! - Client configuration: the immutable settings bundle

pub mod config;
pub mod domain;
pub mod dto;
pub mod operation;

pub use config::ClientConfig;
pub use operation::Operation;
