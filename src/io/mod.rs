//! File collaborators: CSV loaders for the analysis inputs and hourly export.

pub mod export;
pub mod ingest;
