// src/core/mod.rs
//! Storage and file system services

pub mod database;
pub mod fs_ops;
pub mod store;

pub use database::{Database, JobRepository};
pub use fs_ops::FsOps;
pub use store::{InsertOutcome, JobStore};
