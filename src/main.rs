use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use tickframe::{report::RunReport, scenario::ScenarioLoader};

#[derive(Debug, Parser)]
#[command(author, version, about = "tickframe scenario runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/drift.yaml")]
    scenario: PathBuf,

    /// Override frame count (uses scenario default when omitted)
    #[arg(long)]
    frames: Option<u64>,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Advance every frame by this many seconds instead of wall-clock time
    #[arg(long)]
    fixed_delta: Option<f64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(scenario.config.logging.level.as_str()),
    )
    .init();

    let mut app = scenario.build_application(cli.frames)?;
    info!(
        "running scenario '{}' for up to {} frames",
        scenario.name,
        scenario.frames(cli.frames)
    );
    let frames = match cli.fixed_delta {
        Some(delta) => app.run_fixed(delta),
        None => app.run(),
    };

    let report = RunReport::collect(&scenario.name, scenario.seed, &app);
    if let Some(path) = &cli.report {
        report.write(path)?;
        info!("report written to {}", path.display());
    }

    println!(
        "Scenario '{}' completed after {} frames ({} sub-steps, {:.3}s simulated).",
        scenario.name, frames, report.sub_steps, report.simulated_time
    );
    for world in &report.worlds {
        println!(
            "  {}: {}/{} entities enabled, {}",
            world.name,
            world.active_entities,
            world.entities,
            if world.active { "active" } else { "retired" }
        );
    }
    Ok(())
}
