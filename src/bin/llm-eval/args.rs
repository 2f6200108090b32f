use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "llm-eval",
    about = "AI Coding Assistant Evaluation: send the same prompts to several LLM backends"
)]
pub struct CliArgs {
    /// Run every test in every category
    #[arg(long)]
    pub run_all: bool,
    /// Run tests for a specific category
    #[arg(long)]
    pub category: Option<String>,
    /// Test a custom prompt
    #[arg(long)]
    pub prompt: Option<String>,
    /// List available categories
    #[arg(long)]
    pub list_categories: bool,
    /// Load the prompt catalog from a TOML, YAML or JSON file
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
    /// Directory receiving the results and report files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Seconds to wait after each backend call
    #[arg(long)]
    pub delay: Option<f64>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RunMode {
    All,
    Category(String),
    Prompt(String),
}

/// What a single invocation does.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Action {
    ListCategories,
    Run(RunMode),
}

impl CliArgs {
    /// Listing wins over running; `None` when no flag asks for anything.
    pub fn action(&self) -> Option<Action> {
        if self.list_categories {
            Some(Action::ListCategories)
        } else {
            self.run_mode().map(Action::Run)
        }
    }

    /// The requested run, checked in order: run-all, category, prompt.
    pub fn run_mode(&self) -> Option<RunMode> {
        if self.run_all {
            Some(RunMode::All)
        } else if let Some(category) = &self.category {
            Some(RunMode::Category(category.clone()))
        } else {
            self.prompt.clone().map(RunMode::Prompt)
        }
    }
}
