//! Renders the evaluation prompt sent to the model.
//!
//! Rendering is pure: the same context always yields the same text. Only the
//! README is truncated; every other field is short by construction.

use crate::github::RepositoryContext;
use std::fmt::Write;

/// Maximum number of README characters forwarded to the model
pub const README_CHAR_LIMIT: usize = 2000;

const NO_DESCRIPTION: &str = "No description provided";
const UNKNOWN_LANGUAGE: &str = "Unknown";
const NO_README: &str = "No README found.";

const EVALUATION_TASK: &str = r#"TASK:
Act as a senior software engineer and mentor. Evaluate the repository on:
1. Code quality indicators (inferred from structure, linting files, languages)
2. Documentation (README quality, clarity)
3. Project structure (standard conventions for the language)
4. Development consistency (inferred from metadata)

Provide a Score (0-100), a qualitative Level (Beginner, Intermediate or Advanced), a Summary, detailed Strengths/Weaknesses, a specific Roadmap for improvement, and sub-scores (0-100) for consistency, documentation and best practices."#;

/// Builds the evaluation prompt for a repository context
pub fn build_prompt(context: &RepositoryContext) -> String {
    let metadata = &context.metadata;
    let mut prompt = String::new();

    prompt.push_str("Analyze this GitHub repository based on the following metadata:\n\n");
    // Writing to a String cannot fail
    let _ = writeln!(prompt, "Repository: {}/{}", metadata.owner, metadata.name);
    let _ = writeln!(
        prompt,
        "Description: {}",
        metadata
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(NO_DESCRIPTION)
    );
    let _ = writeln!(
        prompt,
        "Primary Language: {}",
        metadata
            .primary_language
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(UNKNOWN_LANGUAGE)
    );
    let _ = writeln!(prompt, "Languages Breakdown: {}", render_languages(context));
    let _ = writeln!(
        prompt,
        "Stars: {}, Forks: {}, Open Issues: {}",
        metadata.stars, metadata.forks, metadata.open_issues
    );

    prompt.push_str("\nRoot File Structure:\n");
    for entry in &context.root_listing {
        let _ = writeln!(prompt, "- {} ({})", entry.name, entry.kind);
    }

    let _ = writeln!(
        prompt,
        "\nREADME Content (First {} characters):",
        README_CHAR_LIMIT
    );
    match context.readme.as_deref() {
        Some(readme) => prompt.push_str(truncate_chars(readme, README_CHAR_LIMIT)),
        None => prompt.push_str(NO_README),
    }

    prompt.push_str("\n\n");
    prompt.push_str(EVALUATION_TASK);
    prompt.push('\n');
    prompt
}

/// Returns the first `limit` characters of `text`, borrowing rather than copying
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

fn render_languages(context: &RepositoryContext) -> String {
    // BTreeMap keeps keys sorted, so the rendering is stable
    serde_json::to_string(&context.languages).unwrap_or_else(|_| "{}".to_string())
}
