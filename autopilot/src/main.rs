use anarchy_autopilot::arena::Arena;
use anarchy_autopilot::benchmark::{run_benchmark, BenchmarkConfig};
use anarchy_autopilot::config::{load_agent_config, resolve_presets, HarnessSettings};
use anarchy_autopilot::runner::{run_agent, write_artifact};
use anarchy_autopilot::util::{parse_seed, parse_seed_csv, parse_seed_file, seed_range, seed_to_hex};
use anarchy_core::bounce::detect_bounces;
use anarchy_core::constants::BALL_RADIUS;
use anarchy_core::intercept::ball_landing_time;
use anarchy_core::Team;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(name = "anarchy-autopilot")]
#[command(about = "Closed-loop harness for the ball-chasing control core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one seeded arena and report touch metrics
    Run {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        preset: Option<String>,
        #[arg(long, value_enum)]
        team: Option<CliTeam>,
        #[arg(long, default_value = "0xA57E0001")]
        seed: String,
        #[arg(long, default_value_t = 1_200)]
        max_ticks: u32,
        /// Write the full artifact (metrics, command log, events) as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run every preset (or a chosen list) across many seeds in parallel
    Bench {
        #[arg(long)]
        presets: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long, default_value_t = 1_200)]
        max_ticks: u32,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Print the resolved agent config and harness settings
    ShowConfig {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        preset: Option<String>,
    },
    /// Print the bounces in a seed's opening ball forecast
    Forecast {
        #[arg(long, default_value = "0xA57E0001")]
        seed: String,
        #[arg(long)]
        horizon: Option<f32>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliTeam {
    Blue,
    Orange,
}

impl From<CliTeam> for Team {
    fn from(value: CliTeam) -> Self {
        match value {
            CliTeam::Blue => Team::Blue,
            CliTeam::Orange => Team::Orange,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let Cli { command } = Cli::parse();
    let settings = HarnessSettings::from_env();

    match command {
        Commands::Run {
            config,
            preset,
            team,
            seed,
            max_ticks,
            output,
        } => {
            let mut agent_config = load_agent_config(config.as_deref(), preset.as_deref())?;
            if let Some(team) = team {
                agent_config.team = team.into();
            }
            let seed = parse_seed(&seed)?;
            let artifact = run_agent(&agent_config, seed, max_ticks, &settings)?;
            let metrics = &artifact.metrics;

            println!("config={}", metrics.config_id);
            println!("seed={}", seed_to_hex(seed));
            println!("ticks={}", metrics.ticks);
            println!("touches={}", metrics.touches);
            println!(
                "first_touch_s={}",
                metrics
                    .first_touch_s
                    .map(|t| format!("{t:.3}"))
                    .unwrap_or_else(|| "none".to_string())
            );
            println!("closest_approach={:.1}", metrics.closest_approach);
            println!("boost_ticks={}", metrics.boost_ticks);
            println!("jump_ticks={}", metrics.jump_ticks);
            println!("dodges={}", metrics.dodges);
            println!("aerials={}", metrics.aerials);
            println!("double_jumps={}", metrics.double_jumps);
            if let Some(path) = output {
                write_artifact(&path, &artifact)?;
                println!("output={}", path.display());
            }
        }
        Commands::Bench {
            presets,
            seeds,
            seed_file,
            seed_start,
            seed_count,
            max_ticks,
            out_dir,
            jobs,
        } => {
            let configs = resolve_presets(presets.as_deref())?;
            let seeds = resolve_seeds(
                seeds.as_deref(),
                seed_file.as_deref(),
                seed_start.as_deref(),
                seed_count,
            )?;
            let out_dir =
                out_dir.unwrap_or_else(|| PathBuf::from(format!("benchmarks/{}", timestamp_suffix())));

            let report = run_benchmark(BenchmarkConfig {
                configs,
                seeds,
                max_ticks,
                out_dir: out_dir.clone(),
                jobs,
                settings,
            })?;

            println!("runs={}", report.run_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("out_dir={}", out_dir.display());
            println!("rankings:");
            for (idx, row) in report.rankings.iter().enumerate() {
                println!(
                    "  {}. {}  touch_rate={:.0}% avg_touches={:.2} avg_first_touch_s={} avg_closest={:.1} avg_dodges={:.2} avg_aerials={:.2}",
                    idx + 1,
                    row.config_id,
                    row.touch_rate * 100.0,
                    row.avg_touches,
                    row.avg_first_touch_s
                        .map(|t| format!("{t:.3}"))
                        .unwrap_or_else(|| "none".to_string()),
                    row.avg_closest_approach,
                    row.avg_dodges,
                    row.avg_aerials
                );
            }
        }
        Commands::ShowConfig { config, preset } => {
            let agent_config = load_agent_config(config.as_deref(), preset.as_deref())?;
            let encoded = serde_json::to_string_pretty(&agent_config)
                .context("failed to serialize agent config")?;
            println!("{encoded}");
            println!("tick_rate={}", settings.tick_rate);
            println!("forecast_horizon_s={}", settings.forecast_horizon_s);
        }
        Commands::Forecast { seed, horizon } => {
            let seed = parse_seed(&seed)?;
            let horizon = horizon.unwrap_or(settings.forecast_horizon_s);
            let arena = Arena::new(seed, Team::Blue, &settings);
            let forecast = arena
                .forecast(horizon)
                .with_context(|| format!("forecast failed for seed={}", seed_to_hex(seed)))?;
            let bounces = detect_bounces(&forecast);

            println!("seed={}", seed_to_hex(seed));
            println!("samples={}", forecast.len());
            println!(
                "free_fall_landing_s={:.3}",
                ball_landing_time(&arena.snapshot().ball, BALL_RADIUS)
            );
            println!("bounces={}", bounces.len());
            for bounce in bounces {
                let p = bounce.sample.position;
                println!(
                    "  index={} t={:.3} x={:.1} y={:.1} z={:.1}",
                    bounce.index, bounce.sample.time, p.x, p.y, p.z
                );
            }
        }
    }

    Ok(())
}

fn resolve_seeds(
    seeds: Option<&str>,
    seed_file: Option<&Path>,
    seed_start: Option<&str>,
    seed_count: u32,
) -> Result<Vec<u32>> {
    if let Some(path) = seed_file {
        return parse_seed_file(path);
    }
    if let Some(csv) = seeds {
        return parse_seed_csv(csv);
    }
    let start = match seed_start {
        Some(start) => parse_seed(start)?,
        None => 0xA57E_0001,
    };
    Ok(seed_range(start, seed_count))
}

fn timestamp_suffix() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}
