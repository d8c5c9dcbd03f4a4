//! GitHub side of the pipeline: input resolution and context aggregation.

/// REST client and context aggregation
pub mod client;
/// Input to owner/name resolution
pub mod identifier;
/// Repository data types
pub mod types;

pub use client::GitHubClient;
pub use identifier::resolve;
pub use types::{
    FileEntry, FileKind, LanguageBreakdown, RepositoryContext, RepositoryIdentifier,
    RepositoryMetadata,
};
