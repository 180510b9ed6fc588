//! Adapters for the domain ports: JSON files on disk and in-memory doubles.

pub mod in_memory;
pub mod json_file;
