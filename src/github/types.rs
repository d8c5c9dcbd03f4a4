use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical owner/name pair for a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryIdentifier {
    /// User or organization login
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl fmt::Display for RepositoryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Public metadata of a repository, read once per analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryMetadata {
    /// Owner login
    pub owner: String,
    /// Repository name
    pub name: String,
    /// Free-form description, if the owner wrote one
    pub description: Option<String>,
    /// Stargazer count
    pub stars: u64,
    /// Fork count
    pub forks: u64,
    /// Primary language as detected by GitHub
    #[serde(rename = "language")]
    pub primary_language: Option<String>,
    /// Open issue count (GitHub includes pull requests)
    pub open_issues: u64,
    /// Repository topics in provider order
    pub topics: Vec<String>,
    /// Default branch name
    pub default_branch: String,
}

impl RepositoryMetadata {
    /// Browser URL of the repository
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

/// Language name to byte count, ordered by name
pub type LanguageBreakdown = BTreeMap<String, u64>;

/// Kind of an entry in the root listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Regular file (also symlinks and submodules)
    File,
    /// Directory
    Dir,
}

impl FileKind {
    /// Maps the GitHub contents `type` field
    pub fn from_github_type(kind: &str) -> Self {
        if kind == "dir" {
            Self::Dir
        } else {
            Self::File
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Dir => write!(f, "dir"),
        }
    }
}

/// One entry of the repository root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Entry name
    pub name: String,
    /// File or directory
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// Path relative to the repository root
    pub path: String,
}

/// Everything the prompt builder needs to know about a repository
///
/// Only `metadata` is guaranteed; the other fields are empty when their read
/// failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryContext {
    /// Repository metadata
    pub metadata: RepositoryMetadata,
    /// Language breakdown, empty when unavailable
    pub languages: LanguageBreakdown,
    /// Root listing, empty when unavailable
    pub root_listing: Vec<FileEntry>,
    /// Decoded README text, absent when unavailable
    pub readme: Option<String>,
}

/// Wire shape of `GET /repos/{owner}/{repo}`
#[derive(Debug, Deserialize)]
pub(crate) struct RepoResponse {
    pub owner: OwnerResponse,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub language: Option<String>,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default = "default_branch")]
    pub default_branch: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwnerResponse {
    pub login: String,
}

/// Wire shape of one `GET /repos/{owner}/{repo}/contents` item
#[derive(Debug, Deserialize)]
pub(crate) struct ContentItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
}

/// Wire shape of `GET /repos/{owner}/{repo}/readme`
#[derive(Debug, Deserialize)]
pub(crate) struct ReadmeResponse {
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

impl From<RepoResponse> for RepositoryMetadata {
    fn from(repo: RepoResponse) -> Self {
        Self {
            owner: repo.owner.login,
            name: repo.name,
            description: repo.description,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            primary_language: repo.language,
            open_issues: repo.open_issues_count,
            topics: repo.topics,
            default_branch: repo.default_branch,
        }
    }
}

impl From<ContentItem> for FileEntry {
    fn from(item: ContentItem) -> Self {
        Self {
            kind: FileKind::from_github_type(&item.kind),
            name: item.name,
            path: item.path,
        }
    }
}
