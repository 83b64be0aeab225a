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

use clap::{Parser, ValueEnum};
use qcs_bnb::config::FringeStrategy;
use qcs_search::expansion::SpatialEligibility;
use std::path::PathBuf;

/// Schedules quay cranes with branch-and-bound, GRASP, or both.
#[derive(Parser, Debug, Clone)]
#[command(name = "qcs", version, about)]
pub struct Cli {
    /// Path to the instance file.
    pub instance: PathBuf,

    /// Engine(s) to run.
    #[arg(long, value_enum, default_value_t = Engine::Both)]
    pub engine: Engine,

    /// Interpret task ids in pair lists as 1-based.
    #[arg(long)]
    pub one_based: bool,

    /// Fringe order of the branch-and-bound engine.
    #[arg(long, value_enum, default_value_t = Strategy::BestFirst)]
    pub strategy: Strategy,

    /// Spatial filter applied to crane/task pairs.
    #[arg(long, value_enum, default_value_t = Eligibility::Zone)]
    pub eligibility: Eligibility,

    /// Disable Pareto dominance pruning.
    #[arg(long)]
    pub no_dominance: bool,

    /// Maximum number of branch-and-bound iterations.
    #[arg(long)]
    pub node_limit: Option<u64>,

    /// Wall-clock budget per engine, in seconds.
    #[arg(long)]
    pub time_limit: Option<f64>,

    /// GRASP greedy bias, in [0, 1].
    #[arg(long, default_value_t = 0.4, value_parser = parse_alpha)]
    pub alpha: f64,

    /// GRASP non-improving swaps tolerated per crane.
    #[arg(long, default_value_t = 100)]
    pub early_stop: u64,

    /// GRASP iterations.
    #[arg(long, default_value_t = 1000)]
    pub iterations: u64,

    /// GRASP random seed.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Write the run records as JSON to this file.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Engine {
    Bnb,
    Grasp,
    Both,
}

impl Engine {
    #[inline]
    pub fn runs_bnb(self) -> bool {
        matches!(self, Engine::Bnb | Engine::Both)
    }

    #[inline]
    pub fn runs_grasp(self) -> bool {
        matches!(self, Engine::Grasp | Engine::Both)
    }
}

fn parse_alpha(value: &str) -> Result<f64, String> {
    let alpha: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if (0.0..=1.0).contains(&alpha) {
        Ok(alpha)
    } else {
        Err(format!("alpha must lie in [0, 1], got {alpha}"))
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    BestFirst,
    DepthFirst,
}

impl From<Strategy> for FringeStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::BestFirst => FringeStrategy::BestFirst,
            Strategy::DepthFirst => FringeStrategy::DepthFirst,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eligibility {
    Zone,
    Unrestricted,
}

impl From<Eligibility> for SpatialEligibility {
    fn from(eligibility: Eligibility) -> Self {
        match eligibility {
            Eligibility::Zone => SpatialEligibility::Zone,
            Eligibility::Unrestricted => SpatialEligibility::Unrestricted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["qcs", "instances/scenario_5x2.txt"]).unwrap();
        assert_eq!(cli.instance, PathBuf::from("instances/scenario_5x2.txt"));
        assert_eq!(cli.engine, Engine::Both);
        assert_eq!(cli.strategy, Strategy::BestFirst);
        assert_eq!(cli.eligibility, Eligibility::Zone);
        assert!(!cli.no_dominance);
        assert_eq!(cli.alpha, 0.4);
        assert_eq!(cli.early_stop, 100);
        assert_eq!(cli.iterations, 1000);
        assert_eq!(cli.time_limit, None);
        assert_eq!(cli.output, None);
    }

    #[test]
    fn test_kebab_case_values() {
        let cli = Cli::try_parse_from([
            "qcs",
            "x.txt",
            "--engine",
            "grasp",
            "--strategy",
            "depth-first",
            "--eligibility",
            "unrestricted",
            "--no-dominance",
            "--time-limit",
            "2.5",
            "--seed",
            "9",
        ])
        .unwrap();
        assert!(!cli.engine.runs_bnb());
        assert!(cli.engine.runs_grasp());
        assert_eq!(FringeStrategy::from(cli.strategy), FringeStrategy::DepthFirst);
        assert_eq!(
            SpatialEligibility::from(cli.eligibility),
            SpatialEligibility::Unrestricted
        );
        assert!(cli.no_dominance);
        assert_eq!(cli.time_limit, Some(2.5));
        assert_eq!(cli.seed, 9);
    }

    #[test]
    fn test_alpha_must_lie_in_unit_interval() {
        let parse = |alpha: &str| Cli::try_parse_from(["qcs", "x.txt", "--alpha", alpha]);
        assert_eq!(parse("1").unwrap().alpha, 1.0);
        assert_eq!(parse("0").unwrap().alpha, 0.0);
        assert!(parse("1.5").is_err());
        assert!(Cli::try_parse_from(["qcs", "x.txt", "--alpha=-0.1"]).is_err());
        assert!(parse("NaN").is_err());
        assert!(parse("abc").is_err());
    }

    #[test]
    fn test_rejects_unknown_engine() {
        assert!(Cli::try_parse_from(["qcs", "x.txt", "--engine", "tabu"]).is_err());
    }
}
