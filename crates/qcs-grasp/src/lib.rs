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

//! # QCS-GRASP
//!
//! Greedy randomized adaptive search for quay crane scheduling. Every
//! iteration builds a complete assignment with a proximity-biased randomized
//! greedy, polishes it with stochastic in-crane swaps evaluated by the
//! oracle, and keeps the best oracle-feasible result.
//!
//! - `construction`: restricted-candidate-list construction.
//! - `local_search`: swap descent with a per-run neighbour memo.
//! - `grasp`: the driver loop.
//! - `config`, `monitor`, `result`, `stats`: tuning, observation and output.
//!
//! Runs are reproducible: all randomness comes from a `ChaCha8Rng` seeded
//! through `GraspConfig::with_seed`.

pub mod config;
pub mod construction;
#[cfg(test)]
mod fixtures;
pub mod grasp;
pub mod local_search;
pub mod monitor;
pub mod result;
pub mod stats;
