use crate::analysis::{AnalysisResult, Level};
use crate::github::RepositoryMetadata;
use colored::{ColoredString, Colorize};
use std::fmt::Write;

/// Renders a finished analysis as a terminal report
pub fn render(metadata: &RepositoryMetadata, analysis: &AnalysisResult) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\n{} / {}  {}",
        metadata.owner.bold(),
        metadata.name.bold(),
        level_badge(analysis.level)
    );
    let _ = writeln!(
        out,
        "{}",
        metadata
            .description
            .as_deref()
            .unwrap_or("No description available.")
            .dimmed()
    );
    let _ = writeln!(
        out,
        "{} Stars  {} Forks  {}",
        metadata.stars,
        metadata.forks,
        metadata.primary_language.as_deref().unwrap_or("Multi-language")
    );
    let _ = writeln!(out, "{}", metadata.html_url().underline());

    let _ = writeln!(out, "\n{} {}/100", "GitGrade Score:".bright_yellow().bold(), score(analysis.score));
    let _ = writeln!(
        out,
        "  Docs {}  Activity {}  Clean Code {}",
        score(analysis.documentation_score),
        score(analysis.consistency_score),
        score(analysis.best_practices_score)
    );

    let _ = writeln!(out, "\n{}", "Summary".bright_cyan().bold());
    let _ = writeln!(out, "  {}", analysis.summary);

    section(&mut out, "Strengths", &analysis.strengths, |_| "+".green());
    section(&mut out, "Areas for Improvement", &analysis.weaknesses, |_| "!".yellow());
    section(&mut out, "Roadmap", &analysis.roadmap, |i| format!("{}.", i + 1).bright_blue());

    out
}

fn section(
    out: &mut String,
    title: &str,
    items: &[String],
    bullet: impl Fn(usize) -> ColoredString,
) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}", title.bright_cyan().bold());
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "  {} {}", bullet(i), item);
    }
}

fn level_badge(level: Level) -> ColoredString {
    let badge = format!("[{} Developer]", level);
    match level {
        Level::Advanced => badge.magenta().bold(),
        Level::Intermediate => badge.blue().bold(),
        Level::Beginner => badge.green().bold(),
    }
}

fn score(value: i64) -> ColoredString {
    let text = value.to_string();
    match value {
        80.. => text.green().bold(),
        50..=79 => text.yellow().bold(),
        _ => text.red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_section() {
        colored::control::set_override(false);
        let metadata = RepositoryMetadata {
            owner: "octo".into(),
            name: "demo".into(),
            description: None,
            stars: 5,
            forks: 1,
            primary_language: None,
            open_issues: 0,
            topics: vec![],
            default_branch: "main".into(),
        };
        let analysis = AnalysisResult {
            score: 72,
            level: Level::Intermediate,
            summary: "Decent start.".into(),
            strengths: vec!["Readable".into()],
            weaknesses: vec!["No CI".into()],
            roadmap: vec!["Add CI".into(), "Write tests".into()],
            consistency_score: 60,
            documentation_score: 80,
            best_practices_score: 70,
        };

        let text = render(&metadata, &analysis);
        assert!(text.contains("octo / demo  [Intermediate Developer]"));
        assert!(text.contains("No description available."));
        assert!(text.contains("5 Stars  1 Forks  Multi-language"));
        assert!(text.contains("GitGrade Score: 72/100"));
        assert!(text.contains("Docs 80  Activity 60  Clean Code 70"));
        assert!(text.contains("+ Readable"));
        assert!(text.contains("! No CI"));
        assert!(text.contains("2. Write tests"));
        assert!(text.contains("https://github.com/octo/demo"));
    }
}
