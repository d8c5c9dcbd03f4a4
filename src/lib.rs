#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! ## Usage
//! ```rust,no_run
//! use gitgrade::{Config, Pipeline};
//!
//! async fn example() -> gitgrade::Result<()> {
//!     let config = Config::load()?;
//!     let pipeline = Pipeline::from_config(&config)?;
//!     let outcome = pipeline.run("https://github.com/rust-lang/log").await?;
//!     println!("{} scored {}", outcome.metadata.name, outcome.analysis.score);
//!     Ok(())
//! }
//! ```

/// Schema-constrained model invocation
pub mod analysis;
/// HTTP API over the pipeline
pub mod api;
/// Configuration loading and environment overrides
pub mod config;
/// Error handling types and utilities
pub mod error;
/// GitHub identifier resolution and context aggregation
pub mod github;
/// Logging configuration and utilities
pub mod logging;
/// End-to-end analysis pipeline
pub mod orchestrator;
/// Evaluation prompt rendering
pub mod prompts;
/// Terminal rendering of an analysis
pub mod report;
/// Single-slot session state for interactive surfaces
pub mod session;

pub use analysis::{AnalysisResult, Level};
pub use config::Config;
pub use error::{AnalyzerError, Result};
pub use github::{RepositoryContext, RepositoryIdentifier, RepositoryMetadata};
pub use orchestrator::{AnalysisOutcome, Pipeline};
pub use session::{Session, SessionState};
