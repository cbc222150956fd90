use std::{num::NonZeroUsize, path::PathBuf};

use clap::Parser;
use pushdown_parser::Recognizer;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use grammars::DemoGrammar;
use settings::Loader;

mod grammars;
mod settings;

/// Runs one of the bundled grammars against an input string.
#[derive(Debug, Parser)]
#[command(name = "pushdown", version, about)]
struct Cli {
    #[arg(value_enum)]
    grammar: DemoGrammar,
    /// Input, recognized character by character.
    input: String,
    /// Upper bound on decide loop iterations.
    #[arg(long)]
    max_steps: Option<NonZeroUsize>,
    /// Configuration file layered over the defaults and `./pushdown.toml`.
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Print the full result as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut loader = Loader::new().with_optional_file("pushdown.toml");
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    if let Some(max_steps) = cli.max_steps {
        loader = loader.set_override("recognizer.max_steps", i64::try_from(max_steps.get())?)?;
    }
    if cli.json {
        loader = loader.set_override("output.json", true)?;
    }
    let config = loader.build()?;
    debug!(?config, "loaded configuration");

    let grammar = cli.grammar.build()?;
    let input: Vec<char> = cli.input.chars().collect();

    let result = Recognizer::new(&grammar)
        .with_config(config.recognizer)
        .decide(&input, 0);

    if config.output.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "{:?} after {} steps, subject = {}",
            result.outcome, result.steps, result.subject
        );
    }

    if !result.success() {
        std::process::exit(1);
    }

    Ok(())
}
