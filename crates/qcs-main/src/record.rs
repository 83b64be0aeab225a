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

use qcs_search::result::{SolverResult, TerminationReason};
use serde::Serialize;
use std::time::Duration;

/// One engine run, as written to the `--output` file.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub engine: &'static str,
    pub instance: String,
    pub result: String,
    pub objective: Option<i64>,
    pub termination: String,
    pub runtime_ms: u128,
    pub iterations: u64,
    pub sequences: Vec<Vec<usize>>,
}

impl RunRecord {
    pub fn new(
        engine: &'static str,
        instance: String,
        result: &SolverResult<i64>,
        termination: &TerminationReason,
        runtime: Duration,
        iterations: u64,
    ) -> Self {
        let sequences = result
            .solution()
            .map(|solution| {
                solution
                    .sequences()
                    .iter()
                    .map(|sequence| sequence.iter().map(|task| task.get()).collect())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            engine,
            instance,
            result: result.to_string(),
            objective: result.objective_value(),
            termination: termination.to_string(),
            runtime_ms: runtime.as_millis(),
            iterations,
            sequences,
        }
    }
}
