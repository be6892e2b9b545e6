//! Core library for retitle
//!
//! This crate implements the **Functional Core** of the retitle application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The retitle project uses a three-crate split to enforce separation of concerns:
//!
//! - **`retitle_core`** (this crate): Pure transformation functions with zero I/O
//! - **`pdf`**: Document parsing and text extraction, behind a mockable backend
//! - **`retitle`**: I/O operations and orchestration (the Imperative Shell)
//!
//! All functions here are deterministic and side-effect free: the title
//! heuristic never opens a file, the filename rules never touch the
//! filesystem, and the summary tally never prints. The shell feeds them
//! metadata strings, page lines, and per-file outcomes, and renders whatever
//! comes back.
//!
//! # Module Organization
//!
//! - [`filename`]: Filename cleaning and already-descriptive classification
//! - [`title`]: The layered title-selection heuristic
//! - [`report`]: Per-file outcomes and run-summary aggregation
//!
//! Each module carries its own fixture-based unit tests (no mocking needed).

pub mod filename;
pub mod report;
pub mod title;

pub use title::TitleConfig;
