//! Sentiment Portrait: Headless Trajectory Rendering
//!
//! Simulates the S/I/N trajectory for a batch of sentiment scores, prints
//! the state table, and optionally plays the animation to completion on an
//! SVG surface, writing the final frame.
//!
//! ```text
//! sentiment_portrait --scores=-5,-4,0,4,5 --svg portrait.svg
//! sentiment_portrait --input posts.json --model oscillator --speed 2
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use sentiment_dynamics::{
    Animator,
    Component,
    Config,
    ManualScheduler,
    ModelKind,
    Observation,
    SentimentCounts,
    SentimentRates,
    Simulator,
    SvgSurface,
    Trajectory,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModelChoice {
    Conserved,
    Oscillator,
}

#[derive(Parser)]
#[command(name = "sentiment_portrait", about = "Simulate and render sentiment phase portraits")]
struct Cli {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated sentiment scores
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    scores: Vec<f64>,

    /// JSON array of observations
    #[arg(long, conflicts_with = "scores")]
    input: Option<PathBuf>,

    /// Override the configured model
    #[arg(long, value_enum)]
    model: Option<ModelChoice>,

    /// Population constant C
    #[arg(long)]
    population: Option<f64>,

    /// Number of trajectory states
    #[arg(long)]
    steps: Option<usize>,

    /// Playback speed multiplier
    #[arg(long)]
    speed: Option<f64>,

    /// Write the final animation frame as SVG
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Debug logging
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    let configured_oscillator = matches!(config.simulator.model, ModelKind::DampedOscillator(_));
    match cli.model {
        Some(ModelChoice::Conserved) if configured_oscillator => {
            config.simulator.model = ModelKind::ConservedThreeState(SentimentRates::default());
        }
        Some(ModelChoice::Oscillator) if !configured_oscillator => {
            config.simulator.model = ModelKind::oscillator();
        }
        _ => {}
    }
    if let Some(population) = cli.population {
        config.simulator.population = population;
    }
    if cli.steps.is_some() {
        config.simulator.steps = cli.steps;
    }
    if let Some(speed) = cli.speed {
        config.animator.speed = speed;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn read_observations(path: &Path) -> Result<Vec<Observation>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_table(trajectory: &Trajectory) {
    println!(
        "  {:>5}  {:>10}  {:>10}  {:>10}  {:>10}  {:>8}",
        "step", "S", "I", "N", "dI", "Δ(I) %"
    );
    let stride = (trajectory.len() / 20).max(1);
    for state in trajectory.iter().step_by(stride) {
        println!(
            "  {:>5}  {:>10.3}  {:>10.3}  {:>10.3}  {:>10.3}  {:>8.2}",
            state.step,
            state.s,
            state.i,
            state.n,
            state.di,
            state.stability_index()
        );
    }
}

/// Play the full animation against a manual clock
fn render_svg(trajectory: Trajectory, config: &Config, path: &Path) -> Result<()> {
    let host = ManualScheduler::new();
    let mut animator = Animator::new(
        SvgSurface::default(),
        trajectory,
        host.clone(),
        config.animator.clone(),
    );

    animator.start();
    let mut frames = 0usize;
    while host.fire_next().is_some() {
        animator.tick();
        frames += 1;
    }
    info!("played {frames} ticks at {:?} per tick", animator.tick_delay());

    let Some(surface) = animator.surface() else {
        bail!("animator has no surface");
    };
    std::fs::write(path, surface.to_svg())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("\n  Wrote {} ({} elements)", path.display(), surface.element_count());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let simulator = Simulator::new(config.simulator.clone())?;

    let (counts, trajectory) = match &cli.input {
        Some(path) => {
            let observations = read_observations(path)?;
            let counts = SentimentCounts::from_observations(&observations);
            (counts, simulator.run_observations(&observations)?)
        }
        None => (
            SentimentCounts::from_scores(&cli.scores),
            simulator.run_scores(&cli.scores)?,
        ),
    };

    println!("═══════════════════════════════════════════════════════════════");
    println!("  Sentiment Phase Dynamics: Trajectory Simulation");
    println!("═══════════════════════════════════════════════════════════════\n");

    println!("Input:");
    println!(
        "  negative = {}, neutral = {}, positive = {}",
        counts.negative, counts.neutral, counts.positive
    );
    println!("  balance  = {:.3}", counts.balance());
    println!("\nModel:");
    println!("  {:?}", config.simulator.model);
    println!("  C = {}, steps = {}", config.simulator.population, config.simulator.step_count());
    if let Some((s, i)) = trajectory.equilibrium() {
        println!("  Equilibrium (S*, I*) = ({:.3}, {:.3})", s, i);
    }

    println!("\nTrajectory:");
    print_table(&trajectory);

    if let (Some((s_min, s_max)), Some((i_min, i_max))) =
        (trajectory.bounds(Component::S), trajectory.bounds(Component::I))
    {
        println!("\n  S ∈ [{:.3}, {:.3}], I ∈ [{:.3}, {:.3}]", s_min, s_max, i_min, i_max);
    }

    if let Some(path) = &cli.svg {
        render_svg(trajectory, &config, path)?;
    }

    Ok(())
}
