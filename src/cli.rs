use colored::*;
use dialoguer::{theme::ColorfulTheme, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Repositories offered as one-keystroke examples
pub const EXAMPLE_REPOSITORIES: [&str; 3] =
    ["facebook/react", "airbnb/javascript", "tailwindlabs/tailwindcss"];

/// What the user typed at the interactive prompt
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Leave the loop
    Quit,
    /// Show usage
    Help,
    /// Show example repositories
    Examples,
    /// Clear the last result and ask again
    Reset,
    /// Analyze this input
    Analyze(String),
}

impl Command {
    /// Interprets one line of input; `None` for a blank line
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let command = match line.to_lowercase().as_str() {
            "q" | "quit" | "exit" => Self::Quit,
            "h" | "help" | "?" => Self::Help,
            "examples" => Self::Examples,
            "new" | "reset" => Self::Reset,
            "1" | "2" | "3" => {
                let index = line.parse::<usize>().unwrap_or(1) - 1;
                Self::Analyze(EXAMPLE_REPOSITORIES[index].to_string())
            }
            _ => Self::Analyze(line.to_string()),
        };
        Some(command)
    }
}

/// Prints the banner shown when interactive mode starts
pub fn print_banner() {
    println!("\n{}", "GitGrade".bright_green().bold());
    println!("{}", "AI-powered grading for GitHub repositories".bright_blue());
    println!("{}\n", "==========================================".bright_yellow());
}

/// Prompts for a repository URL or a command
pub fn prompt_input() -> std::io::Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Repository URL (h for help, q to quit)")
        .allow_empty(true)
        .interact_text()
}

/// Print help information
pub fn print_help() {
    println!("\n{}", "Commands:".bright_yellow());
    println!("  {:<10} - {}", "q".bright_green(), "Quit the application");
    println!("  {:<10} - {}", "h".bright_green(), "Show this help");
    println!("  {:<10} - {}", "examples".bright_green(), "Show example repositories");
    println!("  {:<10} - {}", "new".bright_green(), "Analyze another repository");
    println!("\n{}", "Enter a repository as either:".bright_yellow());
    println!("  https://github.com/owner/repo");
    println!("  owner/repo");
}

/// Print example repositories
pub fn print_examples() {
    println!("\n{}", "Try one of these:".bright_yellow());
    for (i, repo) in EXAMPLE_REPOSITORIES.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).bright_green(), repo);
    }
}

/// Prints an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".bright_red(), message.bright_red());
}

/// Starts the spinner shown while a run is in flight
pub fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("  "), None);
        assert_eq!(Command::parse("Q"), Some(Command::Quit));
        assert_eq!(Command::parse("help"), Some(Command::Help));
        assert_eq!(Command::parse("new"), Some(Command::Reset));
        assert_eq!(
            Command::parse("2"),
            Some(Command::Analyze("airbnb/javascript".into()))
        );
        assert_eq!(
            Command::parse(" octo/demo "),
            Some(Command::Analyze("octo/demo".into()))
        );
    }
}
