use crate::analysis::{AnalysisInvoker, AnalysisResult, ModelService};
use crate::config::Config;
use crate::error::Result;
use crate::github::{self, GitHubClient, RepositoryMetadata};
use crate::prompts;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of one successful run: what the presentation layer renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    /// Repository header data
    pub metadata: RepositoryMetadata,
    /// Model evaluation
    pub analysis: AnalysisResult,
}

/// Runs resolve, aggregate, prompt and invoke in order
///
/// The first failing step ends the run. Nothing is retried.
#[derive(Clone)]
pub struct Pipeline {
    github: GitHubClient,
    invoker: AnalysisInvoker,
}

impl Pipeline {
    /// Creates a pipeline from its two remote collaborators
    pub fn new(github: GitHubClient, model: Arc<dyn ModelService>) -> Self {
        Self {
            github,
            invoker: AnalysisInvoker::new(model),
        }
    }

    /// Creates a pipeline from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            GitHubClient::new(&config.github)?,
            config.model_service()?,
        ))
    }

    /// Analyzes the repository named by `raw_input`
    pub async fn run(&self, raw_input: &str) -> Result<AnalysisOutcome> {
        let id = github::resolve(raw_input)?;
        info!("Analyzing {}", id);

        let context = self.github.aggregate(&id).await?;

        let prompt = prompts::build_prompt(&context);
        debug!("Prompt for {} is {} characters", id, prompt.chars().count());

        let analysis = self.invoker.invoke(&prompt).await?;
        info!(
            "Analysis of {} finished: score {} ({})",
            id, analysis.score, analysis.level
        );

        Ok(AnalysisOutcome {
            metadata: context.metadata,
            analysis,
        })
    }
}
