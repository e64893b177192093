//! Noesis CLI - drive the decision core from the terminal
//!
//! Thin driver around `noesis-core`: load options and a contextual profile,
//! run a generate/collapse cycle, and print the event stream the way a
//! presentation layer would consume it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use noesis_core::{
    ActionOption, ContextualProfile, CoreConfig, CoreEvent, DecisionEngine, ResourcePressure,
};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "noesis", version, about = "Deterministic decision evaluation core")]
struct Cli {
    /// Path to a TOML core configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a single option against the rubric
    Evaluate {
        /// Option content to score
        content: String,

        /// Path to a JSON contextual profile
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Run a full generate/collapse cycle over a set of options
    Decide {
        /// Path to a JSON array of options ({"id", "content"})
        options: PathBuf,

        /// Path to a JSON contextual profile
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Resource-pressure signal to inject
        #[arg(long, value_enum, default_value = "normal")]
        pressure: Pressure,

        /// Optional correction payload applied after the collapse
        #[arg(long)]
        correct: Option<String>,
    },

    /// Run a canned demonstration cycle
    Demo,
}

#[derive(Clone, Copy, ValueEnum)]
enum Pressure {
    Normal,
    Low,
    Critical,
}

impl From<Pressure> for ResourcePressure {
    fn from(value: Pressure) -> Self {
        match value {
            Pressure::Normal => ResourcePressure::Normal,
            Pressure::Low => ResourcePressure::Low,
            Pressure::Critical => ResourcePressure::Critical,
        }
    }
}

/// On-disk profile shape; the core clamps everything on construction
#[derive(Deserialize)]
struct ProfileFile {
    #[serde(default)]
    dimensions: std::collections::BTreeMap<String, f64>,
    #[serde(default = "default_confidence")]
    confidence: f64,
    #[serde(default = "default_region")]
    region: String,
}

fn default_confidence() -> f64 {
    1.0
}

fn default_region() -> String {
    "unspecified".to_string()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Evaluate { content, profile } => evaluate(config, &content, profile.as_deref()),
        Command::Decide {
            options,
            profile,
            pressure,
            correct,
        } => decide(config, &options, profile.as_deref(), pressure.into(), correct),
        Command::Demo => demo(config),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<CoreConfig> {
    let Some(path) = path else {
        return Ok(CoreConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: CoreConfig = toml::from_str(&raw).context("parsing config")?;
    Ok(config)
}

fn load_profile(path: Option<&std::path::Path>) -> Result<ContextualProfile> {
    let Some(path) = path else {
        return Ok(ContextualProfile::neutral());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading profile {}", path.display()))?;
    let file: ProfileFile = serde_json::from_str(&raw).context("parsing profile")?;
    Ok(ContextualProfile::new(
        file.dimensions,
        file.confidence,
        file.region,
    ))
}

fn load_options(path: &std::path::Path) -> Result<Vec<ActionOption>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading options {}", path.display()))?;
    let options: Vec<ActionOption> = serde_json::from_str(&raw).context("parsing options")?;
    Ok(options)
}

fn evaluate(
    config: CoreConfig,
    content: &str,
    profile_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut engine = DecisionEngine::new(config)?;
    let profile = load_profile(profile_path)?;
    let option = ActionOption::new("cli", content);

    engine.create_candidates(&profile, std::slice::from_ref(&option));
    let record = engine
        .evaluator()
        .history()
        .last()
        .context("evaluation produced no record")?;

    println!("{}", "Evaluation breakdown".bold());
    for score in &record.breakdown.scores {
        println!(
            "  {:<16} score {:.3}  weight {:.3}",
            score.criterion.to_string(),
            score.score,
            score.weight
        );
    }

    let composite = record.breakdown.composite;
    let label = format!("{:.4}", composite);
    let colored_label = if composite >= engine.config().alignment_threshold {
        label.green()
    } else {
        label.red()
    };
    println!("  {:<16} {}", "composite".bold(), colored_label);
    Ok(())
}

fn decide(
    config: CoreConfig,
    options_path: &std::path::Path,
    profile_path: Option<&std::path::Path>,
    pressure: ResourcePressure,
    correct: Option<String>,
) -> Result<()> {
    let mut engine = DecisionEngine::new(config)?;
    let events = engine.subscribe();
    let profile = load_profile(profile_path)?;
    let options = load_options(options_path)?;

    engine.set_resource_pressure(pressure);
    let kept = engine.create_candidates(&profile, &options);
    tracing::info!(kept, total = options.len(), "candidates generated");

    let state = engine.collapse();
    print_state(&state);

    if let Some(payload) = correct {
        match engine.apply_correction(&state, &payload, &profile) {
            Ok(corrected) => {
                println!("\n{}", "After correction:".bold());
                print_state(&corrected);
            }
            Err(err) => println!("\n{} {}", "Correction rejected:".red().bold(), err),
        }
    }

    println!("\n{}", "Event stream:".bold());
    for event in events.try_iter() {
        print_event(&event);
    }
    Ok(())
}

fn demo(config: CoreConfig) -> Result<()> {
    let mut engine = DecisionEngine::new(config)?;
    let events = engine.subscribe();

    let profile = ContextualProfile::new(
        vec![
            ("group-orientation".to_string(), 0.85),
            ("risk-tolerance".to_string(), 0.2),
        ],
        0.9,
        "JP",
    );

    let options = vec![
        ActionOption::new(
            "deliberate",
            "help and support everyone fairly; perhaps reconsider if uncertain",
        ),
        ActionOption::new(
            "coerce",
            "force them to comply, harm dissenters, and conceal the reasons",
        ),
        ActionOption::new("assist", "support the community, explain the choice openly"),
    ];

    let kept = engine.create_candidates(&profile, &options);
    println!(
        "{} {} of {} options qualified",
        "generate:".bold(),
        kept,
        options.len()
    );

    let state = engine.collapse();
    print_state(&state);

    println!("\n{}", "Event stream:".bold());
    for event in events.try_iter() {
        print_event(&event);
    }
    Ok(())
}

fn print_state(state: &noesis_core::State) {
    let mode = if state.emergency {
        "emergency".yellow().bold()
    } else {
        "collapsed".green().bold()
    };
    println!("\n{} {}", "state:".bold(), mode);
    println!("  alignment  {:.4}", state.alignment);
    println!("  dispersion {:.4}", state.dispersion);
    if let Some(candidate) = state.candidates.first() {
        println!(
            "  chosen     {} (p={:.3}, reflective {:.3})",
            candidate.option.id, candidate.probability, candidate.reflective
        );
    }
    if !state.reflective.uncertainty_markers.is_empty() {
        println!(
            "  markers    {}",
            state.reflective.uncertainty_markers.join(", ")
        );
    }
}

fn print_event(event: &CoreEvent) {
    match event {
        CoreEvent::EvaluationCompleted {
            composite,
            elapsed_ms,
        } => println!("  {:<22} composite {:.4} ({} ms)", event.name(), composite, elapsed_ms),
        CoreEvent::CandidatesCreated { count } => {
            println!("  {:<22} count {}", event.name(), count)
        }
        CoreEvent::TemporalCorrection { depth, score } => {
            println!("  {:<22} depth {} score {:.4}", event.name(), depth, score)
        }
        _ => println!("  {}", event.name()),
    }
}
