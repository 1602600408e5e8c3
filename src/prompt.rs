//! Operator interaction.
//!
//! The workflow asks questions through [`Prompter`] so that runs can be driven
//! from a terminal or from scripted answers.

use crate::cli::OutputManager;
use std::io::Write;

/// Capability to show choices and read answers from the operator
pub trait Prompter {
    /// Display a numbered list of choices, starting at 1
    fn show_choices(&self, items: &[String]);

    /// Print `prompt` and read one line of input
    ///
    /// End of input reads as an empty answer.
    fn ask(&self, prompt: &str) -> std::io::Result<String>;

    /// Ask a yes/no question, defaulting to no
    fn confirm(&self, question: &str) -> std::io::Result<bool> {
        let answer = self.ask(&format!("{question} [y/N]: "))?;
        Ok(is_affirmative(&answer))
    }
}

/// `y` or `yes`, ignoring case and surrounding whitespace
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Parse a 1-based menu selection into an index below `len`
pub fn parse_selection(answer: &str, len: usize) -> Option<usize> {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|number| (1..=len).contains(number))
        .map(|number| number - 1)
}

/// Prompter reading from stdin and writing to stdout
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompter {
    output: OutputManager,
}

impl TerminalPrompter {
    /// Create a terminal prompter
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for TerminalPrompter {
    fn show_choices(&self, items: &[String]) {
        for (i, item) in items.iter().enumerate() {
            let _ = self.output.numbered(i + 1, item);
        }
    }

    fn ask(&self, prompt: &str) -> std::io::Result<String> {
        print!("{prompt}");
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}
