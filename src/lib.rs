//! tenthousand - 10,000 repetitions in a year
//!
//! This library provides the core functionality for the tenthousand CLI:
//! durable per-task logs of repetitions and progress toward a yearly goal.
//!
//! # Core Concepts
//!
//! - **Tasks**: named counters, each backed by an append-only CSV log
//! - **Entries**: one timestamped count per `add`
//! - **Advisory locks**: `<task>.csv.lock` markers serialize access across processes
//! - **Progress**: completed vs. expected-by-today and the daily rate still needed
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking for concurrency safety
//! - `output`: Human and JSON rendering
//! - `progress`: Pure progress calculation
//! - `storage`: Task logs (the event store)
//! - `suggest`: Typo suggestions for task names

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod progress;
pub mod storage;
pub mod suggest;

pub use error::{Error, Result};
