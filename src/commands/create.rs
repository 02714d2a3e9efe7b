//! Create an agent from a personality name

use colored::*;
use eyre::{Context, Result, eyre};
use std::sync::{Arc, RwLock};

use crate::agent::{Agent, AgentPatch, AgentRegistry, BodyColor, Voice};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::inference::GeminiClient;
use crate::knowledge::WikipediaClient;
use crate::pipeline::{Pipeline, PipelineState};

pub struct CreateOptions {
    pub name: String,
    pub seed: Option<u64>,
    pub voice: Option<Voice>,
    pub color: Option<BodyColor>,
    /// Register the new agent but leave the previous selection in place
    pub keep_current: bool,
    pub quiet: bool,
}

pub fn run(options: CreateOptions, format: OutputFormat, config: &Config) -> Result<()> {
    let api_key = match config.inference_api_key() {
        Ok(key) => Some(key),
        Err(e) => {
            log::warn!("No inference key, voices will use the fallback pair: {:#}", e);
            None
        }
    };

    let knowledge = Arc::new(WikipediaClient::new(config.knowledge.clone()));
    let inference = Arc::new(GeminiClient::new(config.inference.clone(), api_key));
    let registry = Arc::new(RwLock::new(AgentRegistry::default()));
    let previous = registry
        .read()
        .map_err(|_| eyre!("Agent registry lock poisoned"))?
        .current_id()
        .to_string();

    let mut pipeline = Pipeline::new(knowledge, inference, registry);
    if let Some(seed) = options.seed {
        pipeline = pipeline.with_seed(seed);
    }
    if format == OutputFormat::Text && !options.quiet {
        pipeline = pipeline.with_observer(Box::new(|state: &PipelineState| {
            if let Some(message) = state.progress_message() {
                eprintln!("{} {}", "→".blue(), message);
            }
        }));
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let created = match runtime.block_on(pipeline.create(&options.name)) {
        Ok(agent) => agent,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(1);
        }
    };
    log::debug!("Pipeline finished in state {:?}", pipeline.state());

    let shared = pipeline.registry();
    let mut registry = shared.write().map_err(|_| eyre!("Agent registry lock poisoned"))?;

    let patch = AgentPatch {
        voice: options.voice,
        body_color: options.color,
        ..Default::default()
    };
    let agent = if patch.is_empty() {
        created
    } else {
        log::info!("Applying overrides to {}: {:?}", created.id, patch);
        registry.update(&created.id, &patch)?.clone()
    };

    if options.keep_current {
        registry.set_current(&previous)?;
        log::info!("Kept {} as the current agent", previous);
    }
    let selected = registry.current().id == agent.id;

    print_agent(&agent, selected, format)
}

fn print_agent(agent: &Agent, selected: bool, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(agent)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(agent)?),
        OutputFormat::Text => {
            let marker = if selected { "(current)".green() } else { "".normal() };
            println!("{} {} {}", "✓".green(), agent.name.bold(), marker);
            println!("  id:    {}", agent.id.dimmed());
            println!("  voice: {}", agent.voice.to_string().cyan());
            println!("  color: {}", agent.body_color.to_string().magenta());
            match agent.image_url {
                Some(ref url) => println!("  image: {}", url),
                None => println!("  image: {}", "(none)".dimmed()),
            }
            println!();
            println!("{}", agent.personality);
        }
    }

    Ok(())
}
