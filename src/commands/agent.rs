//! Agent inspection commands

use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::agent::color::BodyColor;
use crate::agent::prompt::system_instructions;
use crate::agent::registry::Collection;
use crate::agent::{Agent, AgentRegistry, Voice};
use crate::cli::{AgentAction, OutputFormat};
use crate::config::Config;

pub fn run(action: AgentAction, config: &Config) -> Result<()> {
    let registry = AgentRegistry::default();
    match action {
        AgentAction::List { format } => list_agents(&registry, OutputFormat::resolve(format)),
        AgentAction::Show { id, format } => show_agent(&registry, &id, OutputFormat::resolve(format)),
        AgentAction::Prompt { id } => show_prompt(&registry, &id, config),
        AgentAction::Voices { format } => list_voices(OutputFormat::resolve(format)),
        AgentAction::Colors { format } => list_colors(OutputFormat::resolve(format)),
    }
}

fn lookup<'a>(registry: &'a AgentRegistry, id: &str) -> &'a Agent {
    match registry.get(id) {
        Some(agent) => agent,
        None => {
            eprintln!("{} Agent '{}' not found", "✗".red(), id);
            std::process::exit(1);
        }
    }
}

fn list_agents(registry: &AgentRegistry, format: OutputFormat) -> Result<()> {
    #[derive(Serialize)]
    struct AgentSummary<'a> {
        id: &'a str,
        name: &'a str,
        voice: Voice,
        body_color: BodyColor,
        current: bool,
    }

    let summaries: Vec<AgentSummary> = registry
        .presets()
        .iter()
        .chain(registry.personal())
        .map(|a| AgentSummary {
            id: &a.id,
            name: &a.name,
            voice: a.voice,
            body_color: a.body_color,
            current: a.id == registry.current_id(),
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&summaries)?),
        OutputFormat::Text => {
            println!("{}", "Available Agents:".bold());
            println!();

            for summary in &summaries {
                let marker = if summary.current { "●".green() } else { "○".dimmed() };
                println!("  {} {} {}", marker, summary.name.bold(), format!("({})", summary.id).dimmed());
                println!("    Voice: {}  Color: {}", summary.voice.to_string().cyan(), summary.body_color);
            }
        }
    }

    Ok(())
}

fn show_agent(registry: &AgentRegistry, id: &str, format: OutputFormat) -> Result<()> {
    let agent = lookup(registry, id);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(agent)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(agent)?),
        OutputFormat::Text => {
            println!("{} {}", "Agent:".bold(), agent.name.green().bold());
            println!();
            println!("{} {}", "Id:".bold(), agent.id);
            let collection = match registry.collection_of(&agent.id) {
                Some(Collection::Preset) => "preset",
                Some(Collection::Personal) | None => "personal",
            };
            println!("{} {}", "Collection:".bold(), collection);
            println!("{} {}", "Voice:".bold(), agent.voice.to_string().cyan());
            println!("{} {}", "Color:".bold(), agent.body_color);
            if let Some(ref url) = agent.image_url {
                println!("{} {}", "Image:".bold(), url);
            }
            println!();
            println!("{}", "Personality:".bold());
            for line in agent.personality.lines() {
                println!("  {}", line);
            }
        }
    }

    Ok(())
}

fn show_prompt(registry: &AgentRegistry, id: &str, config: &Config) -> Result<()> {
    let agent = lookup(registry, id);
    let now = chrono::Local::now().naive_local();
    println!("{}", system_instructions(agent, &config.user, now));
    Ok(())
}

fn list_voices(format: OutputFormat) -> Result<()> {
    #[derive(Serialize)]
    struct VoiceGroups {
        male: Vec<Voice>,
        female: Vec<Voice>,
        uncertain: Vec<Voice>,
    }

    let groups = VoiceGroups {
        male: Voice::MALE.to_vec(),
        female: Voice::FEMALE.to_vec(),
        uncertain: Voice::UNCERTAIN.to_vec(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&groups)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&groups)?),
        OutputFormat::Text => {
            let names = |voices: &[Voice]| voices.iter().map(|v| v.name()).collect::<Vec<_>>().join(", ");
            println!("{}", "Voices:".bold());
            println!("  {:<10} {}", "male", names(&groups.male).cyan());
            println!("  {:<10} {}", "female", names(&groups.female).cyan());
            println!("  {:<10} {}", "uncertain", names(&groups.uncertain).cyan());
        }
    }

    Ok(())
}

fn list_colors(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&BodyColor::PALETTE)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&BodyColor::PALETTE)?),
        OutputFormat::Text => {
            println!("{}", "Palette:".bold());
            for color in BodyColor::PALETTE {
                println!("  {} {:?}", color.hex(), color);
            }
        }
    }

    Ok(())
}
