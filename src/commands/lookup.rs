//! Show how a search term classifies, without creating anything

use colored::*;
use eyre::Result;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::knowledge::{KnowledgeSource, WikipediaClient};
use crate::pipeline::{PipelineError, page_or_error};

pub fn run(term: &str, format: OutputFormat, config: &Config) -> Result<()> {
    let term = term.trim();
    if term.is_empty() {
        eprintln!("{} {}", "✗".red(), PipelineError::EmptyInput);
        std::process::exit(1);
    }

    let client = WikipediaClient::new(config.knowledge.clone());
    let outcome = client.lookup(term);
    log::info!("Lookup \"{}\": {}", term, outcome.tag());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&outcome)?),
        OutputFormat::Text => match page_or_error(outcome) {
            Ok(page) => {
                println!("{} {}", "✓".green(), page.title.bold());
                if let Some(ref url) = page.image_url {
                    println!("  image: {}", url);
                }
                println!("  {} characters", page.extract.chars().count());
                println!();
                println!("{}", page.extract);
            }
            Err(e) => {
                eprintln!("{} {}", "✗".red(), e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
