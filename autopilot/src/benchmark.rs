use crate::config::HarnessSettings;
use crate::runner::{run_agent, RunMetrics};
use crate::util::seed_to_hex;
use anarchy_core::AgentConfig;
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub configs: Vec<AgentConfig>,
    pub seeds: Vec<u32>,
    pub max_ticks: u32,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
    pub settings: HarnessSettings,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub config_id: String,
    pub seed: u32,
    pub seed_hex: String,
    pub ticks: u32,
    pub touches: u32,
    pub first_touch_s: Option<f32>,
    pub closest_approach: f32,
    pub boost_ticks: u32,
    pub jump_ticks: u32,
    pub dodges: u32,
    pub aerials: u32,
    pub double_jumps: u32,
}

impl From<&RunMetrics> for RunRecord {
    fn from(metrics: &RunMetrics) -> Self {
        Self {
            config_id: metrics.config_id.clone(),
            seed: metrics.seed,
            seed_hex: seed_to_hex(metrics.seed),
            ticks: metrics.ticks,
            touches: metrics.touches,
            first_touch_s: metrics.first_touch_s,
            closest_approach: metrics.closest_approach,
            boost_ticks: metrics.boost_ticks,
            jump_ticks: metrics.jump_ticks,
            dodges: metrics.dodges,
            aerials: metrics.aerials,
            double_jumps: metrics.double_jumps,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigAggregate {
    pub config_id: String,
    pub runs: usize,
    /// Fraction of runs with at least one touch.
    pub touch_rate: f64,
    pub avg_touches: f64,
    /// Mean over the runs that touched at all.
    pub avg_first_touch_s: Option<f64>,
    pub avg_closest_approach: f64,
    pub avg_boost_ticks: f64,
    pub avg_dodges: f64,
    pub avg_aerials: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub max_ticks: u32,
    pub tick_rate: u32,
    pub forecast_horizon_s: f32,
    pub jobs: Option<usize>,
    pub configs: Vec<String>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub rankings: Vec<ConfigAggregate>,
    pub runs: Vec<RunRecord>,
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.configs.is_empty() {
        return Err(anyhow!("benchmark requires at least one agent config"));
    }
    if config.jobs == Some(0) {
        return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let run_jobs: Vec<(&AgentConfig, u32)> = config
        .configs
        .iter()
        .flat_map(|agent| config.seeds.iter().map(move |seed| (agent, *seed)))
        .collect();

    let run_one = |(agent, seed): &(&AgentConfig, u32)| -> Result<RunMetrics> {
        let artifact = run_agent(agent, *seed, config.max_ticks, &config.settings)
            .with_context(|| format!("benchmark run failed for config={} seed={seed:#x}", agent.id))?;
        Ok(artifact.metrics)
    };

    let run_results: Vec<Result<RunMetrics>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };

    let runs = run_results.into_iter().collect::<Result<Vec<_>>>()?;

    let mut grouped: HashMap<&str, Vec<&RunMetrics>> = HashMap::new();
    for run in &runs {
        grouped.entry(run.config_id.as_str()).or_default().push(run);
    }

    let mut rankings: Vec<ConfigAggregate> = grouped
        .into_iter()
        .map(|(config_id, runs)| aggregate(config_id, &runs))
        .collect();
    rankings.sort_by(|a, b| {
        b.touch_rate
            .total_cmp(&a.touch_rate)
            .then_with(|| {
                let a_first = a.avg_first_touch_s.unwrap_or(f64::INFINITY);
                let b_first = b.avg_first_touch_s.unwrap_or(f64::INFINITY);
                a_first.total_cmp(&b_first)
            })
            .then_with(|| a.avg_closest_approach.total_cmp(&b.avg_closest_approach))
    });

    let mut run_records: Vec<RunRecord> = runs.iter().map(RunRecord::from).collect();
    run_records.sort_by(|a, b| {
        a.config_id
            .cmp(&b.config_id)
            .then_with(|| a.seed.cmp(&b.seed))
    });

    write_runs_csv(&config.out_dir.join("runs.csv"), &run_records)?;

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        max_ticks: config.max_ticks,
        tick_rate: config.settings.tick_rate,
        forecast_horizon_s: config.settings.forecast_horizon_s,
        jobs: config.jobs,
        configs: config.configs.iter().map(|c| c.id.clone()).collect(),
        seeds: config.seeds.clone(),
        run_count: run_records.len(),
        rankings,
        runs: run_records,
    };

    let report_path = config.out_dir.join("summary.json");
    fs::write(
        &report_path,
        serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?,
    )
    .with_context(|| format!("failed writing {}", report_path.display()))?;

    Ok(report)
}

fn aggregate(config_id: &str, runs: &[&RunMetrics]) -> ConfigAggregate {
    let n = runs.len().max(1) as f64;
    let mean = |f: fn(&RunMetrics) -> f64| runs.iter().map(|r| f(r)).sum::<f64>() / n;

    let first_touches: Vec<f64> = runs
        .iter()
        .filter_map(|r| r.first_touch_s)
        .map(f64::from)
        .collect();
    let avg_first_touch_s = if first_touches.is_empty() {
        None
    } else {
        Some(first_touches.iter().sum::<f64>() / first_touches.len() as f64)
    };

    ConfigAggregate {
        config_id: config_id.to_string(),
        runs: runs.len(),
        touch_rate: first_touches.len() as f64 / n,
        avg_touches: mean(|r| r.touches as f64),
        avg_first_touch_s,
        avg_closest_approach: mean(|r| r.closest_approach as f64),
        avg_boost_ticks: mean(|r| r.boost_ticks as f64),
        avg_dodges: mean(|r| r.dodges as f64),
        avg_aerials: mean(|r| r.aerials as f64),
    }
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    let mut csv = String::from(
        "config_id,seed_hex,seed,ticks,touches,first_touch_s,closest_approach,boost_ticks,jump_ticks,dodges,aerials,double_jumps\n",
    );
    for row in rows {
        let first_touch = row
            .first_touch_s
            .map(|t| format!("{t:.3}"))
            .unwrap_or_default();
        csv.push_str(&format!(
            "{},{},{},{},{},{},{:.1},{},{},{},{},{}\n",
            row.config_id,
            row.seed_hex,
            row.seed,
            row.ticks,
            row.touches,
            first_touch,
            row.closest_approach,
            row.boost_ticks,
            row.jump_ticks,
            row.dodges,
            row.aerials,
            row.double_jumps
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
