//! Run category inference on arbitrary text

use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use crate::agent::voice::candidates;
use crate::config::Config;
use crate::inference::{GeminiClient, TraitInferrer};

pub fn run(text: Option<String>, file: Option<PathBuf>, config: &Config) -> Result<()> {
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => {
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        (None, None) => {
            if io::stdin().is_terminal() {
                eyre::bail!("Provide TEXT, --file, or pipe text on stdin");
            }
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
            buf
        }
    };

    if text.trim().is_empty() {
        eyre::bail!("Nothing to classify: input text is empty");
    }

    let client = GeminiClient::new(config.inference.clone(), config.inference_api_key().ok());
    let category = client.infer_category(text.trim());

    let voices: Vec<&str> = candidates(category).iter().map(|v| v.name()).collect();

    println!("{}", category.label().bold());
    println!("  voices: {}", voices.join(", ").cyan());

    Ok(())
}
