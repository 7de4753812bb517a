//! Core storage logic for Movomint.
//!
//! This crate routes file uploads and downloads to the object storage bucket
//! of the current deployment environment. The object store itself is an
//! injected collaborator; configuration comes from `movomint-shared`.
//!
//! # Modules
//!
//! - `storage` - Environment routing, key naming, content types and object URLs

pub mod storage;

pub use storage::{StorageConfig, StorageError, StorageRouter, UploadOutcome};
