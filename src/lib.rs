//! # Mocktrack
//!
//! A local mock-exam performance tracker with deterministic report
//! aggregation.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (mocks, sections, mistakes, report DTOs)
//! - **normalize**: Raw submission validation and coercion
//! - **report**: Bracket classification, rolling windows, averages, assembly
//! - **batch**: Per-item outcome tracking for bulk operations
//! - **storage**: Filesystem JSONL operations
//! - **store**: Mock and mistake persistence with cascade semantics
//! - **config**: Configuration loading and validation

pub mod batch;
pub mod config;
pub mod models;
pub mod normalize;
pub mod report;
pub mod storage;
pub mod store;

pub use models::*;
