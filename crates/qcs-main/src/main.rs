// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

mod cli;
mod record;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use qcs_bnb::{
    bnb::BnbSolver,
    config::BnbConfig,
    monitor::{
        composite::CompositeTreeSearchMonitor, log::LogMonitor as BnbLogMonitor,
        time_limit::TimeLimitMonitor as BnbTimeLimitMonitor,
    },
    result::BnbSolverOutcome,
};
use qcs_grasp::{
    config::GraspConfig,
    grasp::GraspSolver,
    monitor::{
        composite::CompositeGraspMonitor, log::LogMonitor as GraspLogMonitor,
        time_limit::TimeLimitMonitor as GraspTimeLimitMonitor,
    },
    result::GraspOutcome,
};
use qcs_model::{loading::ProblemLoader, problem::Problem};
use qcs_oracle::{constraints::SequencingConstraints, disjunctive::DisjunctiveOracle};
use qcs_search::{
    bound::{DominanceRule, NoDominance, ParetoDominance},
    expansion::ExpansionPolicy,
    search_problem::QcScheduling,
};
use record::RunRecord;
use std::{fs::File, io::BufWriter, time::Duration};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

fn main() -> Result<()> {
    enable_tracing();
    let cli = Cli::parse();

    let time_limit = cli
        .time_limit
        .map(Duration::try_from_secs_f64)
        .transpose()
        .context("--time-limit must be a non-negative number of seconds")?;

    let problem: Problem<i64> = ProblemLoader::new()
        .one_based_task_ids(cli.one_based)
        .from_path(&cli.instance)
        .with_context(|| format!("failed to load instance {}", cli.instance.display()))?;
    let instance = cli
        .instance
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.instance.display().to_string());

    tracing::info!(
        instance = %instance,
        tasks = problem.num_tasks(),
        cranes = problem.num_cranes(),
        non_simultaneous = problem.non_simultaneous_pairs().len(),
        precedence = problem.precedence_pairs().len(),
        "instance loaded"
    );

    let search = QcScheduling::new(&problem, ExpansionPolicy::new(cli.eligibility.into()));
    let mut records = Vec::new();

    if cli.engine.runs_bnb() {
        records.push(run_bnb(&cli, &search, &instance, time_limit));
    }
    if cli.engine.runs_grasp() {
        records.push(run_grasp(&cli, &search, &instance, time_limit));
    }

    if let Some(path) = &cli.output {
        let file = File::create(path)
            .with_context(|| format!("failed to create output file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &records)
            .with_context(|| format!("failed to write run records to {}", path.display()))?;
        tracing::info!(path = %path.display(), runs = records.len(), "run records written");
    }

    Ok(())
}

fn run_bnb(
    cli: &Cli,
    search: &QcScheduling<'_, i64>,
    instance: &str,
    time_limit: Option<Duration>,
) -> RunRecord {
    let mut config = BnbConfig::new().with_strategy(cli.strategy.into());
    if let Some(limit) = cli.node_limit {
        config = config.with_iteration_limit(limit);
    }
    tracing::info!(%config, dominance = !cli.no_dominance, "running branch-and-bound");

    let outcome = if cli.no_dominance {
        solve_bnb(config, search, &mut NoDominance, time_limit)
    } else {
        solve_bnb(config, search, &mut ParetoDominance, time_limit)
    };

    println!("== Branch-and-bound ==");
    println!("Result: {}", outcome.result());
    println!("Termination: {}", outcome.termination_reason());
    if let Some(solution) = outcome.result().solution() {
        print!("{solution}");
        let path: Vec<String> = outcome.decisions().iter().map(ToString::to_string).collect();
        println!("Decisions: {}", path.join(", "));
    }
    println!("{}", outcome.statistics());

    RunRecord::new(
        "bnb",
        instance.to_string(),
        outcome.result(),
        outcome.termination_reason(),
        outcome.statistics().time_total,
        outcome.statistics().iterations,
    )
}

fn solve_bnb<D>(
    config: BnbConfig,
    search: &QcScheduling<'_, i64>,
    dominance: &mut D,
    time_limit: Option<Duration>,
) -> BnbSolverOutcome<i64>
where
    D: DominanceRule<i64, SequencingConstraints<i64>>,
{
    let mut monitor = CompositeTreeSearchMonitor::with_capacity(2);
    if let Some(limit) = time_limit {
        monitor.add_monitor(BnbTimeLimitMonitor::with_default_check_interval(limit));
    }
    monitor.add_monitor(BnbLogMonitor::<i64>::default());

    BnbSolver::with_config(config).solve(search, &mut DisjunctiveOracle::new(), dominance, monitor)
}

fn run_grasp(
    cli: &Cli,
    search: &QcScheduling<'_, i64>,
    instance: &str,
    time_limit: Option<Duration>,
) -> RunRecord {
    let config = GraspConfig::new()
        .with_alpha(cli.alpha)
        .with_early_stop(cli.early_stop)
        .with_max_iterations(cli.iterations)
        .with_seed(cli.seed);
    tracing::info!(%config, "running GRASP");

    let mut monitor = CompositeGraspMonitor::new();
    if let Some(limit) = time_limit {
        monitor.add_monitor(GraspTimeLimitMonitor::with_default_check_interval(limit));
    }
    monitor.add_monitor(GraspLogMonitor::<i64>::default());

    let outcome: GraspOutcome<i64> =
        GraspSolver::with_config(config).solve(search, &mut DisjunctiveOracle::new(), monitor);

    println!("== GRASP ==");
    println!("Result: {}", outcome.result());
    println!("Termination: {}", outcome.termination_reason());
    if let Some(solution) = outcome.result().solution() {
        print!("{solution}");
    }
    println!("{}", outcome.statistics());

    RunRecord::new(
        "grasp",
        instance.to_string(),
        outcome.result(),
        outcome.termination_reason(),
        outcome.statistics().time_total,
        outcome.statistics().iterations,
    )
}
