//! jobdeck - review scraped and recommended job postings
//!
//! The library exposes the jobs API gateway, the data model and the
//! interactive screen so the binary, integration tests and benchmarks share
//! one implementation.

pub mod display;
pub mod formatting;
pub mod gateway;
pub mod models;
pub mod tui;
