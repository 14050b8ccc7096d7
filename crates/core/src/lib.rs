//! Core report logic for public budget data.
//!
//! This crate contains the report engine with ZERO web dependencies.
//! Source ingestion, aggregation, formatting and snapshot caching live here.
//!
//! # Modules
//!
//! - `dataset` - Typed revenue and expenditure records, spreadsheet ingestion
//! - `hierarchy` - Revenue classification tree
//! - `names` - Code to display-name tables
//! - `engine` - Hierarchical aggregation and variance math
//! - `reports` - Report assembly and export
//! - `cache` - Fingerprinted snapshot caching

pub mod cache;
pub mod dataset;
pub mod engine;
pub mod hierarchy;
pub mod names;
pub mod reports;
